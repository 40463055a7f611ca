use actix_web::web;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::result::DatabaseErrorKind;

use crate::data::models::{
    CharacterChange, CharacterInsert, CharacterItemRow, CharacterSelect, CharacterSpellRow,
    ItemInsert, ItemSelect, SpellInsert, SpellSelect, UserInsert, UserSelect,
};
use crate::errors::{Error, Result};

pub type Database = r2d2::Pool<ConnectionManager<PgConnection>>;

// ------------------------------------------------
// Users

pub async fn create_user<T: ToString>(
    database: &Database,
    username: T,
    password: T,
) -> Result<UserSelect> {
    let username = username.to_string();
    let password = password.to_string();
    let mut conn = database.get()?;
    let result = web::block(move || {
        use crate::schema::users::dsl;

        diesel::insert_into(dsl::users)
            .values(UserInsert { username, password })
            .get_result::<UserSelect>(&mut conn)
    })
    .await?;

    match result {
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Err(Error::UsernameTaken)
        }
        other => Ok(other?),
    }
}

pub async fn fetch_user_by_username<T: ToString>(
    database: &Database,
    username: T,
) -> Result<Option<UserSelect>> {
    let username = username.to_string();
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::users::dsl;

        dsl::users
            .filter(dsl::username.eq(username))
            .first(&mut conn)
            .optional()
    })
    .await??;
    Ok(record)
}

pub async fn fetch_user(database: &Database, user_id: i32) -> Result<Option<UserSelect>> {
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::users::dsl;

        dsl::users
            .filter(dsl::id.eq(user_id))
            .first(&mut conn)
            .optional()
    })
    .await??;
    Ok(record)
}

// ------------------------------------------------
// Characters

pub async fn create_character(
    database: &Database,
    record: CharacterInsert,
) -> Result<CharacterSelect> {
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::characters::dsl;

        diesel::insert_into(dsl::characters)
            .values(record)
            .get_result::<CharacterSelect>(&mut conn)
    })
    .await??;
    Ok(record)
}

pub async fn fetch_character(
    database: &Database,
    character_id: i32,
) -> Result<Option<CharacterSelect>> {
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::characters::dsl;

        dsl::characters
            .filter(dsl::id.eq(character_id))
            .first(&mut conn)
            .optional()
    })
    .await??;
    Ok(record)
}

pub async fn fetch_characters(database: &Database, user_id: i32) -> Result<Vec<CharacterSelect>> {
    let mut conn = database.get()?;
    let records = web::block(move || {
        use crate::schema::characters::dsl;

        dsl::characters
            .filter(dsl::user_id.eq(user_id))
            .order(dsl::id.asc())
            .get_results(&mut conn)
    })
    .await??;
    Ok(records)
}

pub async fn update_character(
    database: &Database,
    character_id: i32,
    change: CharacterChange,
) -> Result<CharacterSelect> {
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::characters::dsl;

        diesel::update(dsl::characters.filter(dsl::id.eq(character_id)))
            .set((&change, dsl::modified.eq(diesel::dsl::now)))
            .get_result::<CharacterSelect>(&mut conn)
    })
    .await??;
    Ok(record)
}

// Link rows go with the character via ON DELETE CASCADE.
pub async fn delete_character(database: &Database, character_id: i32) -> Result<usize> {
    let mut conn = database.get()?;
    let count = web::block(move || {
        use crate::schema::characters::dsl;

        diesel::delete(dsl::characters.filter(dsl::id.eq(character_id))).execute(&mut conn)
    })
    .await??;
    Ok(count)
}

// ------------------------------------------------
// Items

pub async fn fetch_items(database: &Database) -> Result<Vec<ItemSelect>> {
    let mut conn = database.get()?;
    let records = web::block(move || {
        use crate::schema::items::dsl;

        dsl::items.order(dsl::id.asc()).get_results(&mut conn)
    })
    .await??;
    Ok(records)
}

pub async fn fetch_item(database: &Database, item_id: i32) -> Result<Option<ItemSelect>> {
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::items::dsl;

        dsl::items
            .filter(dsl::id.eq(item_id))
            .first(&mut conn)
            .optional()
    })
    .await??;
    Ok(record)
}

pub async fn fetch_item_by_index<T: ToString>(
    database: &Database,
    api_index: T,
) -> Result<Option<ItemSelect>> {
    let api_index = api_index.to_string();
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::items::dsl;

        dsl::items
            .filter(dsl::api_index.eq(api_index))
            .first(&mut conn)
            .optional()
    })
    .await??;
    Ok(record)
}

// Insert-or-ignore keyed on the unique api_index, then re-select, so two
// concurrent first-time misses converge on a single row.
pub async fn insert_item(database: &Database, record: ItemInsert) -> Result<ItemSelect> {
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::items::dsl;

        diesel::insert_into(dsl::items)
            .values(&record)
            .on_conflict(dsl::api_index)
            .do_nothing()
            .execute(&mut conn)?;

        dsl::items
            .filter(dsl::api_index.eq(&record.api_index))
            .first(&mut conn)
    })
    .await??;
    Ok(record)
}

pub async fn delete_item(database: &Database, item_id: i32) -> Result<usize> {
    let mut conn = database.get()?;
    let count = web::block(move || {
        use crate::schema::items::dsl;

        diesel::delete(dsl::items.filter(dsl::id.eq(item_id))).execute(&mut conn)
    })
    .await??;
    Ok(count)
}

// ------------------------------------------------
// Spells

pub async fn fetch_spells(database: &Database) -> Result<Vec<SpellSelect>> {
    let mut conn = database.get()?;
    let records = web::block(move || {
        use crate::schema::spells::dsl;

        dsl::spells.order(dsl::id.asc()).get_results(&mut conn)
    })
    .await??;
    Ok(records)
}

pub async fn fetch_spell(database: &Database, spell_id: i32) -> Result<Option<SpellSelect>> {
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::spells::dsl;

        dsl::spells
            .filter(dsl::id.eq(spell_id))
            .first(&mut conn)
            .optional()
    })
    .await??;
    Ok(record)
}

pub async fn fetch_spell_by_index<T: ToString>(
    database: &Database,
    api_index: T,
) -> Result<Option<SpellSelect>> {
    let api_index = api_index.to_string();
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::spells::dsl;

        dsl::spells
            .filter(dsl::api_index.eq(api_index))
            .first(&mut conn)
            .optional()
    })
    .await??;
    Ok(record)
}

pub async fn insert_spell(database: &Database, record: SpellInsert) -> Result<SpellSelect> {
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::spells::dsl;

        diesel::insert_into(dsl::spells)
            .values(&record)
            .on_conflict(dsl::api_index)
            .do_nothing()
            .execute(&mut conn)?;

        dsl::spells
            .filter(dsl::api_index.eq(&record.api_index))
            .first(&mut conn)
    })
    .await??;
    Ok(record)
}

pub async fn delete_spell(database: &Database, spell_id: i32) -> Result<usize> {
    let mut conn = database.get()?;
    let count = web::block(move || {
        use crate::schema::spells::dsl;

        diesel::delete(dsl::spells.filter(dsl::id.eq(spell_id))).execute(&mut conn)
    })
    .await??;
    Ok(count)
}

// ------------------------------------------------
// Item links

pub async fn fetch_item_link(
    database: &Database,
    character_id: i32,
    item_id: i32,
) -> Result<Option<CharacterItemRow>> {
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::character_items::dsl;

        dsl::character_items
            .filter(dsl::character_id.eq(character_id))
            .filter(dsl::item_id.eq(item_id))
            .first(&mut conn)
            .optional()
    })
    .await??;
    Ok(record)
}

pub async fn attach_item(database: &Database, character_id: i32, item_id: i32) -> Result<()> {
    let mut conn = database.get()?;
    web::block(move || {
        use crate::schema::character_items::dsl;

        diesel::insert_into(dsl::character_items)
            .values(CharacterItemRow {
                character_id,
                item_id,
            })
            .execute(&mut conn)
    })
    .await??;
    Ok(())
}

pub async fn detach_item(database: &Database, character_id: i32, item_id: i32) -> Result<usize> {
    let mut conn = database.get()?;
    let count = web::block(move || {
        use crate::schema::character_items::dsl;

        diesel::delete(
            dsl::character_items
                .filter(dsl::character_id.eq(character_id))
                .filter(dsl::item_id.eq(item_id)),
        )
        .execute(&mut conn)
    })
    .await??;
    Ok(count)
}

pub async fn fetch_character_items(
    database: &Database,
    character_id: i32,
) -> Result<Vec<ItemSelect>> {
    let mut conn = database.get()?;
    let records = web::block(move || {
        use crate::schema::{character_items, items};

        character_items::table
            .inner_join(items::table)
            .filter(character_items::character_id.eq(character_id))
            .order(items::id.asc())
            .select(ItemSelect::as_select())
            .load(&mut conn)
    })
    .await??;
    Ok(records)
}

// Batched variant for list views: one query for all characters at once.
pub async fn fetch_items_for_characters(
    database: &Database,
    character_ids: Vec<i32>,
) -> Result<Vec<(i32, ItemSelect)>> {
    let mut conn = database.get()?;
    let records = web::block(move || {
        use crate::schema::{character_items, items};

        character_items::table
            .inner_join(items::table)
            .filter(character_items::character_id.eq_any(character_ids))
            .order(items::id.asc())
            .select((character_items::character_id, ItemSelect::as_select()))
            .load(&mut conn)
    })
    .await??;
    Ok(records)
}

// ------------------------------------------------
// Spell links

pub async fn fetch_spell_link(
    database: &Database,
    character_id: i32,
    spell_id: i32,
) -> Result<Option<CharacterSpellRow>> {
    let mut conn = database.get()?;
    let record = web::block(move || {
        use crate::schema::character_spells::dsl;

        dsl::character_spells
            .filter(dsl::character_id.eq(character_id))
            .filter(dsl::spell_id.eq(spell_id))
            .first(&mut conn)
            .optional()
    })
    .await??;
    Ok(record)
}

pub async fn attach_spell(database: &Database, character_id: i32, spell_id: i32) -> Result<()> {
    let mut conn = database.get()?;
    web::block(move || {
        use crate::schema::character_spells::dsl;

        diesel::insert_into(dsl::character_spells)
            .values(CharacterSpellRow {
                character_id,
                spell_id,
            })
            .execute(&mut conn)
    })
    .await??;
    Ok(())
}

pub async fn detach_spell(database: &Database, character_id: i32, spell_id: i32) -> Result<usize> {
    let mut conn = database.get()?;
    let count = web::block(move || {
        use crate::schema::character_spells::dsl;

        diesel::delete(
            dsl::character_spells
                .filter(dsl::character_id.eq(character_id))
                .filter(dsl::spell_id.eq(spell_id)),
        )
        .execute(&mut conn)
    })
    .await??;
    Ok(count)
}

pub async fn fetch_character_spells(
    database: &Database,
    character_id: i32,
) -> Result<Vec<SpellSelect>> {
    let mut conn = database.get()?;
    let records = web::block(move || {
        use crate::schema::{character_spells, spells};

        character_spells::table
            .inner_join(spells::table)
            .filter(character_spells::character_id.eq(character_id))
            .order(spells::id.asc())
            .select(SpellSelect::as_select())
            .load(&mut conn)
    })
    .await??;
    Ok(records)
}

pub async fn fetch_spells_for_characters(
    database: &Database,
    character_ids: Vec<i32>,
) -> Result<Vec<(i32, SpellSelect)>> {
    let mut conn = database.get()?;
    let records = web::block(move || {
        use crate::schema::{character_spells, spells};

        character_spells::table
            .inner_join(spells::table)
            .filter(character_spells::character_id.eq_any(character_ids))
            .order(spells::id.asc())
            .select((character_spells::character_id, SpellSelect::as_select()))
            .load(&mut conn)
    })
    .await??;
    Ok(records)
}
