use actix_web::{delete, get, post, web, HttpResponse, Responder};
use validator::Validate;

use crate::clients::{ReferenceClient, TranslationClient};
use crate::data::payloads::{EnrichRequest, SpellRecord, UserClaims};
use crate::enrichment;
use crate::errors::{Error, Result};
use crate::queries::{self, Database};

#[get("/spells")]
pub async fn list_spells(pool: web::Data<Database>) -> Result<impl Responder> {
    let records = queries::fetch_spells(&pool).await?;
    let response: Vec<SpellRecord> = records.into_iter().map(SpellRecord::from).collect();
    Ok(web::Json(response))
}

#[get("/spells/{spell_id}")]
pub async fn get_spell(pool: web::Data<Database>, path: web::Path<i32>) -> Result<impl Responder> {
    let record = queries::fetch_spell(&pool, path.into_inner())
        .await?
        .ok_or(Error::NotFound("Zauber"))?;

    Ok(web::Json(SpellRecord::from(record)))
}

#[post("/spells")]
pub async fn create_spell(
    pool: web::Data<Database>,
    reference: web::Data<ReferenceClient>,
    translator: web::Data<TranslationClient>,
    _user: UserClaims,
    form: web::Json<EnrichRequest>,
) -> Result<impl Responder> {
    // validate the form fields
    form.validate()?;

    let record = enrichment::resolve_spell(&pool, &reference, &translator, &form.name).await?;
    Ok(HttpResponse::Created().json(SpellRecord::from(record)))
}

#[delete("/spells/{spell_id}")]
pub async fn delete_spell(
    pool: web::Data<Database>,
    _user: UserClaims,
    path: web::Path<i32>,
) -> Result<impl Responder> {
    let count = queries::delete_spell(&pool, path.into_inner()).await?;
    if count == 0 {
        return Err(Error::NotFound("Zauber"));
    }
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;

    fn bearer(token: &str) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", token))
    }

    #[actix_web::test]
    async fn test_create_spell_from_reference_api() {
        let database = "test_routes_create_spell";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let app = test_utils::service(&pool, &upstream.url("")).await;
        let token = test_utils::authenticate(&app, "TEST").await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/spells")
                .insert_header(bearer(&token))
                .set_json(serde_json::json!({"name": "Magic Missile"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = test::read_body(resp).await;
        let spell: SpellRecord = serde_json::from_slice(&body).unwrap();
        assert_eq!(spell.api_index, "magic-missile");
        assert_eq!(spell.level, Some(1));
        assert_eq!(spell.school.as_deref(), Some("Evocation"));
        assert_eq!(spell.components.as_deref(), Some("V, S"));
        assert!(!spell.name_de.is_empty());

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_list_spells_is_public() {
        let database = "test_routes_list_spells_public";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let app = test_utils::service(&pool, &upstream.url("")).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/spells").to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let all: Vec<SpellRecord> = serde_json::from_slice(&body).unwrap();
        assert!(all.is_empty());

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_create_spell_unknown_name() {
        let database = "test_routes_create_spell_unknown";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let app = test_utils::service(&pool, &upstream.url("")).await;
        let token = test_utils::authenticate(&app, "TEST").await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/spells")
                .insert_header(bearer(&token))
                .set_json(serde_json::json!({"name": "Summon Bagels"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        test_utils::teardown(database);
    }
}
