use actix_web::{delete, get, post, web, HttpResponse, Responder};
use validator::Validate;

use crate::clients::{ReferenceClient, TranslationClient};
use crate::data::payloads::{EnrichRequest, ItemRecord, UserClaims};
use crate::enrichment;
use crate::errors::{Error, Result};
use crate::queries::{self, Database};

#[get("/items")]
pub async fn list_items(pool: web::Data<Database>) -> Result<impl Responder> {
    let records = queries::fetch_items(&pool).await?;
    let response: Vec<ItemRecord> = records.into_iter().map(ItemRecord::from).collect();
    Ok(web::Json(response))
}

#[get("/items/{item_id}")]
pub async fn get_item(pool: web::Data<Database>, path: web::Path<i32>) -> Result<impl Responder> {
    let record = queries::fetch_item(&pool, path.into_inner())
        .await?
        .ok_or(Error::NotFound("Item"))?;

    Ok(web::Json(ItemRecord::from(record)))
}

#[post("/items")]
pub async fn create_item(
    pool: web::Data<Database>,
    reference: web::Data<ReferenceClient>,
    translator: web::Data<TranslationClient>,
    _user: UserClaims,
    form: web::Json<EnrichRequest>,
) -> Result<impl Responder> {
    // validate the form fields
    form.validate()?;

    let record = enrichment::resolve_item(&pool, &reference, &translator, &form.name).await?;
    Ok(HttpResponse::Created().json(ItemRecord::from(record)))
}

#[delete("/items/{item_id}")]
pub async fn delete_item(
    pool: web::Data<Database>,
    _user: UserClaims,
    path: web::Path<i32>,
) -> Result<impl Responder> {
    let count = queries::delete_item(&pool, path.into_inner()).await?;
    if count == 0 {
        return Err(Error::NotFound("Item"));
    }
    Ok(HttpResponse::NoContent().finish())
}
