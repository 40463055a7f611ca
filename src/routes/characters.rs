use std::collections::HashMap;

use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

use crate::clients::{ReferenceClient, TranslationClient};
use crate::data::models::{CharacterChange, CharacterInsert, CharacterSelect};
use crate::data::payloads::{CharacterCreate, CharacterDetail, CharacterUpdate, EnrichRequest, UserClaims};
use crate::enrichment;
use crate::errors::{Error, Result};
use crate::queries::{self, Database};

// Every character operation goes through here: 404 when the row does not
// exist, 403 when it belongs to someone else.
async fn owned_character(
    pool: &Database,
    user: &UserClaims,
    character_id: i32,
) -> Result<CharacterSelect> {
    let record = queries::fetch_character(pool, character_id)
        .await?
        .ok_or(Error::NotFound("Charakter"))?;

    if record.user_id != user.id {
        return Err(Error::Forbidden);
    }
    Ok(record)
}

async fn character_detail(pool: &Database, record: CharacterSelect) -> Result<CharacterDetail> {
    let items = queries::fetch_character_items(pool, record.id).await?;
    let spells = queries::fetch_character_spells(pool, record.id).await?;
    Ok(CharacterDetail::assemble(record, items, spells))
}

fn group<T>(rows: Vec<(i32, T)>) -> HashMap<i32, Vec<T>> {
    let mut map: HashMap<i32, Vec<T>> = HashMap::new();
    for (id, row) in rows {
        map.entry(id).or_default().push(row);
    }
    map
}

#[get("/characters")]
pub async fn list_characters(pool: web::Data<Database>, user: UserClaims) -> Result<impl Responder> {
    let records = queries::fetch_characters(&pool, user.id).await?;
    let ids: Vec<i32> = records.iter().map(|c| c.id).collect();

    let mut items = group(queries::fetch_items_for_characters(&pool, ids.clone()).await?);
    let mut spells = group(queries::fetch_spells_for_characters(&pool, ids).await?);

    let response: Vec<CharacterDetail> = records
        .into_iter()
        .map(|record| {
            let items = items.remove(&record.id).unwrap_or_default();
            let spells = spells.remove(&record.id).unwrap_or_default();
            CharacterDetail::assemble(record, items, spells)
        })
        .collect();

    Ok(web::Json(response))
}

#[get("/characters/{character_id}")]
pub async fn get_character(
    pool: web::Data<Database>,
    user: UserClaims,
    path: web::Path<i32>,
) -> Result<impl Responder> {
    let record = owned_character(&pool, &user, path.into_inner()).await?;
    Ok(web::Json(character_detail(&pool, record).await?))
}

#[post("/characters")]
pub async fn create_character(
    pool: web::Data<Database>,
    reference: web::Data<ReferenceClient>,
    user: UserClaims,
    form: web::Json<CharacterCreate>,
) -> Result<impl Responder> {
    // validate the form fields
    form.validate()?;
    enrichment::validate_gameclass(&reference, &form.gameclass).await?;

    let form = form.into_inner();
    let record = queries::create_character(
        &pool,
        CharacterInsert {
            user_id: user.id,
            name: form.name,
            species: form.species,
            gameclass: form.gameclass,
            level: form.level.unwrap_or(1),
            strength: form.strength.unwrap_or(10),
            dexterity: form.dexterity.unwrap_or(10),
            constitution: form.constitution.unwrap_or(10),
            intelligence: form.intelligence.unwrap_or(10),
            wisdom: form.wisdom.unwrap_or(10),
            charisma: form.charisma.unwrap_or(10),
            image_url: form.image_url,
        },
    )
    .await?;

    // a fresh character has no links yet
    let detail = CharacterDetail::assemble(record, Vec::new(), Vec::new());
    Ok(HttpResponse::Created().json(detail))
}

#[put("/characters/{character_id}")]
pub async fn update_character(
    pool: web::Data<Database>,
    reference: web::Data<ReferenceClient>,
    user: UserClaims,
    path: web::Path<i32>,
    form: web::Json<CharacterUpdate>,
) -> Result<impl Responder> {
    // validate the form fields
    form.validate()?;
    let record = owned_character(&pool, &user, path.into_inner()).await?;

    if let Some(gameclass) = &form.gameclass {
        enrichment::validate_gameclass(&reference, gameclass).await?;
    }

    let form = form.into_inner();
    let change = CharacterChange {
        name: form.name,
        species: form.species,
        gameclass: form.gameclass,
        level: form.level,
        strength: form.strength,
        dexterity: form.dexterity,
        constitution: form.constitution,
        intelligence: form.intelligence,
        wisdom: form.wisdom,
        charisma: form.charisma,
        image_url: form.image_url,
    };

    let record = queries::update_character(&pool, record.id, change).await?;
    Ok(web::Json(character_detail(&pool, record).await?))
}

#[delete("/characters/{character_id}")]
pub async fn delete_character(
    pool: web::Data<Database>,
    user: UserClaims,
    path: web::Path<i32>,
) -> Result<impl Responder> {
    let record = owned_character(&pool, &user, path.into_inner()).await?;
    queries::delete_character(&pool, record.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/characters/{character_id}/items")]
pub async fn attach_item(
    pool: web::Data<Database>,
    reference: web::Data<ReferenceClient>,
    translator: web::Data<TranslationClient>,
    user: UserClaims,
    path: web::Path<i32>,
    form: web::Json<EnrichRequest>,
) -> Result<impl Responder> {
    // validate the form fields
    form.validate()?;
    let record = owned_character(&pool, &user, path.into_inner()).await?;

    // resolve through the cache, hitting the external APIs only on a miss
    let item = enrichment::resolve_item(&pool, &reference, &translator, &form.name).await?;

    if queries::fetch_item_link(&pool, record.id, item.id)
        .await?
        .is_some()
    {
        return Err(Error::AlreadyAttached("Item"));
    }
    queries::attach_item(&pool, record.id, item.id).await?;

    Ok(HttpResponse::Created().json(character_detail(&pool, record).await?))
}

#[delete("/characters/{character_id}/items/{item_id}")]
pub async fn detach_item(
    pool: web::Data<Database>,
    user: UserClaims,
    path: web::Path<(i32, i32)>,
) -> Result<impl Responder> {
    let (character_id, item_id) = path.into_inner();
    let record = owned_character(&pool, &user, character_id).await?;

    let count = queries::detach_item(&pool, record.id, item_id).await?;
    if count == 0 {
        return Err(Error::NotFound("Verknüpfung"));
    }
    Ok(HttpResponse::NoContent().finish())
}

#[post("/characters/{character_id}/spells")]
pub async fn attach_spell(
    pool: web::Data<Database>,
    reference: web::Data<ReferenceClient>,
    translator: web::Data<TranslationClient>,
    user: UserClaims,
    path: web::Path<i32>,
    form: web::Json<EnrichRequest>,
) -> Result<impl Responder> {
    // validate the form fields
    form.validate()?;
    let record = owned_character(&pool, &user, path.into_inner()).await?;

    let spell = enrichment::resolve_spell(&pool, &reference, &translator, &form.name).await?;

    if queries::fetch_spell_link(&pool, record.id, spell.id)
        .await?
        .is_some()
    {
        return Err(Error::AlreadyAttached("Zauber"));
    }
    queries::attach_spell(&pool, record.id, spell.id).await?;

    Ok(HttpResponse::Created().json(character_detail(&pool, record).await?))
}

#[delete("/characters/{character_id}/spells/{spell_id}")]
pub async fn detach_spell(
    pool: web::Data<Database>,
    user: UserClaims,
    path: web::Path<(i32, i32)>,
) -> Result<impl Responder> {
    let (character_id, spell_id) = path.into_inner();
    let record = owned_character(&pool, &user, character_id).await?;

    let count = queries::detach_spell(&pool, record.id, spell_id).await?;
    if count == 0 {
        return Err(Error::NotFound("Verknüpfung"));
    }
    Ok(HttpResponse::NoContent().finish())
}
