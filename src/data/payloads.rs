use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::data::models::{CharacterSelect, ItemSelect, SpellSelect, UserSelect};
use crate::errors::{Error, Result};
use crate::utilities;

// ------------------------------------------------
// Forms
#[derive(Deserialize, Serialize, Clone, Validate)]
pub struct Register {
    #[validate(length(min = 4, max = 32), does_not_contain(pattern = " "))]
    pub username: String,
    #[validate(length(min = 8, max = 256), does_not_contain(pattern = " "))]
    pub password: String,
}

#[derive(Deserialize, Serialize, Clone, Validate)]
pub struct Login {
    #[validate(length(min = 4, max = 32), does_not_contain(pattern = " "))]
    pub username: String,
    #[validate(length(min = 8, max = 256), does_not_contain(pattern = " "))]
    pub password: String,
}

#[derive(Deserialize, Serialize, Clone, Validate)]
pub struct CharacterCreate {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub species: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub gameclass: String,
    #[validate(range(min = 1, max = 20))]
    pub level: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub strength: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub dexterity: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub constitution: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub intelligence: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub wisdom: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub charisma: Option<i32>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Default, Validate)]
pub struct CharacterUpdate {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub species: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub gameclass: Option<String>,
    #[validate(range(min = 1, max = 20))]
    pub level: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub strength: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub dexterity: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub constitution: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub intelligence: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub wisdom: Option<i32>,
    #[validate(range(min = 1, max = 30))]
    pub charisma: Option<i32>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
}

// Name of a reference-API record to resolve through the enrichment cache.
#[derive(Deserialize, Serialize, Clone, Validate)]
pub struct EnrichRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}
// ------------------------------------------------

// ------------------------------------------------
// Session
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserClaims {
    pub id: i32,
    pub username: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(claims: &UserClaims) -> Result<Self> {
        Ok(Self {
            access_token: utilities::token::encode(claims)?,
            token_type: "bearer".into(),
        })
    }
}

fn bearer_claims(req: &HttpRequest) -> Result<UserClaims> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(Error::Unauthorized)?
        .to_str()
        .map_err(|_| Error::Unauthorized)?;

    let token = value.strip_prefix("Bearer ").ok_or(Error::Unauthorized)?;

    utilities::token::decode(token).map_err(|_| Error::Unauthorized)
}

// Explicit session context: handlers take the claims as an argument
// instead of reading ambient state.
impl FromRequest for UserClaims {
    type Error = Error;
    type Future = Ready<Result<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(bearer_claims(req))
    }
}
// ------------------------------------------------

// ------------------------------------------------
// Responses
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub created: DateTime<Utc>,
}

impl From<UserSelect> for UserInfo {
    fn from(record: UserSelect) -> Self {
        Self {
            id: record.id,
            username: record.username,
            created: record.created,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ItemRecord {
    pub id: i32,
    pub api_index: String,
    pub name_en: String,
    pub name_de: String,
    pub description_en: Option<String>,
    pub description_de: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl From<ItemSelect> for ItemRecord {
    fn from(record: ItemSelect) -> Self {
        Self {
            id: record.id,
            api_index: record.api_index,
            name_en: record.name_en,
            name_de: record.name_de,
            description_en: record.description_en,
            description_de: record.description_de,
            created: record.created,
            modified: record.modified,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SpellRecord {
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

impl From<SpellSelect> for SpellRecord {
    fn from(record: SpellSelect) -> Self {
        Self {
            id: record.id,
            api_index: record.api_index,
            name_en: record.name_en,
            name_de: record.name_de,
            description_en: record.description_en,
            description_de: record.description_de,
            level: record.level,
            casting_time: record.casting_time,
            spell_range: record.spell_range,
            components: record.components,
            duration: record.duration,
            school: record.school,
            created: record.created,
            modified: record.modified,
        }
    }
}

// German-facing summaries embedded in a character sheet.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ItemSummary {
    pub id: i32,
    pub name_de: String,
    pub description_de: Option<String>,
}

impl From<ItemSelect> for ItemSummary {
    fn from(record: ItemSelect) -> Self {
        Self {
            id: record.id,
            name_de: record.name_de,
            description_de: record.description_de,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SpellSummary {
    pub id: i32,
    pub name_de: String,
    pub description_de: Option<String>,
    pub level: Option<i32>,
    pub casting_time: Option<String>,
    pub spell_range: Option<String>,
    pub components: Option<String>,
    pub duration: Option<String>,
}

impl From<SpellSelect> for SpellSummary {
    fn from(record: SpellSelect) -> Self {
        Self {
            id: record.id,
            name_de: record.name_de,
            description_de: record.description_de,
            level: record.level,
            casting_time: record.casting_time,
            spell_range: record.spell_range,
            components: record.components,
            duration: record.duration,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CharacterDetail {
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
    pub items: Vec<ItemSummary>,
    pub spells: Vec<SpellSummary>,
}

impl CharacterDetail {
    pub fn assemble(
        record: CharacterSelect,
        items: Vec<ItemSelect>,
        spells: Vec<SpellSelect>,
    ) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            species: record.species,
            gameclass: record.gameclass,
            level: record.level,
            strength: record.strength,
            dexterity: record.dexterity,
            constitution: record.constitution,
            intelligence: record.intelligence,
            wisdom: record.wisdom,
            charisma: record.charisma,
            image_url: record.image_url,
            created: record.created,
            modified: record.modified,
            items: items.into_iter().map(ItemSummary::from).collect(),
            spells: spells.into_iter().map(SpellSummary::from).collect(),
        }
    }
}
// ------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn character_form() -> CharacterCreate {
        CharacterCreate {
            name: "Grog".into(),
            species: None,
            gameclass: "Fighter".into(),
            level: Some(5),
            strength: None,
            dexterity: None,
            constitution: None,
            intelligence: None,
            wisdom: None,
            charisma: None,
            image_url: None,
        }
    }

    #[test]
    fn test_validate_login1() {
        // all fields are correct
        let form = Login {
            username: "TEST".into(),
            password: "PASSWORD".into(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_validate_login2() {
        // username is too short
        let form = Login {
            username: "TES".into(),
            password: "PASSWORD".into(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validate_login3() {
        // password contains a space
        let form = Login {
            username: "TEST".into(),
            password: "PASS WORD".into(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validate_register1() {
        // all fields are correct
        let form = Register {
            username: "TEST".into(),
            password: "PASSWORD".into(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_validate_register2() {
        // password is too short
        let form = Register {
            username: "TEST".into(),
            password: "PASS".into(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validate_register3() {
        // username contains a space
        let form = Register {
            username: "TEST NAME".into(),
            password: "PASSWORD".into(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validate_character1() {
        // all fields are correct
        assert!(character_form().validate().is_ok());
    }

    #[test]
    fn test_validate_character2() {
        // level out of range
        let mut form = character_form();
        form.level = Some(21);
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validate_character3() {
        // ability score out of range
        let mut form = character_form();
        form.strength = Some(0);
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validate_character4() {
        // empty name
        let mut form = character_form();
        form.name = "".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validate_enrich_request() {
        let form = EnrichRequest { name: "".into() };
        assert!(form.validate().is_err());

        let form = EnrichRequest {
            name: "magic missile".into(),
        };
        assert!(form.validate().is_ok());
    }
}
