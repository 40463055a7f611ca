use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::errors::{Error, Result};

// Stored verbatim when translation cannot be attempted (no key, empty text).
pub const TRANSLATION_UNAVAILABLE: &str = "Übersetzung nicht verfügbar.";

// Lowercase, spaces to hyphens: "Magic Missile" -> "magic-missile".
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

#[derive(Deserialize, Debug, Clone)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct EquipmentDetail {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub desc: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct SpellDetail {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub desc: Vec<String>,
    pub level: Option<i32>,
    pub casting_time: Option<String>,
    pub range: Option<String>,
    #[serde(default)]
    pub components: Vec<String>,
    pub duration: Option<String>,
    pub school: Option<NamedRef>,
}

#[derive(Deserialize, Debug)]
struct ClassList {
    #[serde(default)]
    results: Vec<NamedRef>,
}

// Read-only client for the D&D 5e reference API.
pub struct ReferenceClient {
    http: reqwest::Client,
    base_url: String,
    classes: OnceCell<Vec<String>>,
}

impl ReferenceClient {
    pub fn new<T: Into<String>>(base_url: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            classes: OnceCell::new(),
        }
    }

    // 404 means "the reference API has no such record" and is a normal
    // outcome; every other failure is an upstream error.
    async fn fetch<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status()?;
        Ok(Some(response.json().await?))
    }

    pub async fn equipment(&self, api_index: &str) -> Result<Option<EquipmentDetail>> {
        self.fetch(&format!("/api/equipment/{}", api_index)).await
    }

    pub async fn spell(&self, api_index: &str) -> Result<Option<SpellDetail>> {
        self.fetch(&format!("/api/spells/{}", api_index)).await
    }

    // Fetched once per process and reused for every class validation.
    pub async fn classes(&self) -> Result<&[String]> {
        let classes = self
            .classes
            .get_or_try_init(|| async {
                let list: Option<ClassList> = self.fetch("/api/classes").await?;
                let names = list
                    .map(|l| l.results.into_iter().map(|r| r.name).collect::<Vec<_>>())
                    .unwrap_or_default();
                tracing::debug!("cached {} character classes", names.len());
                Ok::<_, Error>(names)
            })
            .await?;
        Ok(classes.as_slice())
    }
}

#[derive(Deserialize, Debug)]
struct TranslationList {
    #[serde(default)]
    translations: Vec<TranslatedText>,
}

#[derive(Deserialize, Debug)]
struct TranslatedText {
    text: String,
}

// DeepL-style translation client.
pub struct TranslationClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TranslationClient {
    pub fn new<T: Into<String>>(base_url: T, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    pub async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            return Ok(TRANSLATION_UNAVAILABLE.into());
        };
        if text.is_empty() {
            return Ok(TRANSLATION_UNAVAILABLE.into());
        }

        let target = target_lang.to_uppercase();
        let params = [
            ("auth_key", api_key.as_str()),
            ("text", text),
            ("target_lang", target.as_str()),
        ];

        let response = self
            .http
            .post(format!("{}/v2/translate", self.base_url))
            .form(&params)
            .send()
            .await?
            .error_for_status()?;

        let body: TranslationList = response.json().await?;
        body.translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or(Error::UpstreamPayload)
    }
}
