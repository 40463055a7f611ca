use chrono::{DateTime, Utc};
use diesel::prelude::*;

// ------------------------------------------------
// Users
#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserInsert {
    pub username: String,
    pub password: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserSelect {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}
// ------------------------------------------------

// ------------------------------------------------
// Characters
#[derive(Insertable)]
#[diesel(table_name = crate::schema::characters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CharacterInsert {
    pub user_id: i32,
    pub name: String,
    pub species: Option<String>,
    pub gameclass: String,
    pub level: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub image_url: Option<String>,
}

// Partial update; None fields are left untouched.
#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::characters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CharacterChange {
    pub name: Option<String>,
    pub species: Option<String>,
    pub gameclass: Option<String>,
    pub level: Option<i32>,
    pub strength: Option<i32>,
    pub dexterity: Option<i32>,
    pub constitution: Option<i32>,
    pub intelligence: Option<i32>,
    pub wisdom: Option<i32>,
    pub charisma: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::characters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CharacterSelect {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub species: Option<String>,
    pub gameclass: String,
    pub level: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub image_url: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}
// ------------------------------------------------

// ------------------------------------------------
// Items
#[derive(Insertable)]
#[diesel(table_name = crate::schema::items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemInsert {
    pub api_index: String,
    pub name_en: String,
    pub name_de: String,
    pub description_en: Option<String>,
    pub description_de: Option<String>,
}

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemSelect {
    pub id: i32,
    pub api_index: String,
    pub name_en: String,
    pub name_de: String,
    pub description_en: Option<String>,
    pub description_de: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}
// ------------------------------------------------

// ------------------------------------------------
// Spells
#[derive(Insertable)]
#[diesel(table_name = crate::schema::spells)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SpellInsert {
    pub api_index: String,
    pub name_en: String,
    pub name_de: String,
    pub description_en: Option<String>,
    pub description_de: Option<String>,
    pub level: Option<i32>,
    pub casting_time: Option<String>,
    pub spell_range: Option<String>,
    pub components: Option<String>,
    pub duration: Option<String>,
    pub school: Option<String>,
}

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::spells)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SpellSelect {
    pub id: i32,
    pub api_index: String,
    pub name_en: String,
    pub name_de: String,
    pub description_en: Option<String>,
    pub description_de: Option<String>,
    pub level: Option<i32>,
    pub casting_time: Option<String>,
    pub spell_range: Option<String>,
    pub components: Option<String>,
    pub duration: Option<String>,
    pub school: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}
// ------------------------------------------------

// ------------------------------------------------
// Link rows
#[derive(Queryable, Insertable)]
#[diesel(table_name = crate::schema::character_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CharacterItemRow {
    pub character_id: i32,
    pub item_id: i32,
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = crate::schema::character_spells)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CharacterSpellRow {
    pub character_id: i32,
    pub spell_id: i32,
}
// ------------------------------------------------
