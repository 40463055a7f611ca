use crate::clients::{normalize_name, ReferenceClient, TranslationClient};
use crate::data::models::{ItemInsert, ItemSelect, SpellInsert, SpellSelect};
use crate::errors::{Error, Result};
use crate::queries::{self, Database};

// Resolve a user-supplied item name to a cached, translated record. A cache
// hit never touches the external services. Concurrent first-time misses are
// collapsed by the api_index upsert in queries::insert_item.
pub async fn resolve_item(
    database: &Database,
    reference: &ReferenceClient,
    translator: &TranslationClient,
    name: &str,
) -> Result<ItemSelect> {
    let api_index = normalize_name(name);

    if let Some(existing) = queries::fetch_item_by_index(database, &api_index).await? {
        return Ok(existing);
    }

    let detail = reference
        .equipment(&api_index)
        .await?
        .ok_or(Error::NotFound("Item"))?;

    let description_en = detail.desc.join("\n");
    let name_de = translator.translate(&detail.name, "de").await?;
    let description_de = translator.translate(&description_en, "de").await?;

    tracing::info!(api_index = %detail.index, "caching new item from reference API");

    queries::insert_item(
        database,
        ItemInsert {
            api_index: detail.index,
            name_en: detail.name,
            name_de,
            description_en: Some(description_en),
            description_de: Some(description_de),
        },
    )
    .await
}

pub async fn resolve_spell(
    database: &Database,
    reference: &ReferenceClient,
    translator: &TranslationClient,
    name: &str,
) -> Result<SpellSelect> {
    let api_index = normalize_name(name);

    if let Some(existing) = queries::fetch_spell_by_index(database, &api_index).await? {
        return Ok(existing);
    }

    let detail = reference
        .spell(&api_index)
        .await?
        .ok_or(Error::NotFound("Zauber"))?;

    let description_en = detail.desc.join("\n");
    let name_de = translator.translate(&detail.name, "de").await?;
    let description_de = translator.translate(&description_en, "de").await?;

    tracing::info!(api_index = %detail.index, "caching new spell from reference API");

    queries::insert_spell(
        database,
        SpellInsert {
            api_index: detail.index,
            name_en: detail.name,
            name_de,
            description_en: Some(description_en),
            description_de: Some(description_de),
            level: detail.level,
            casting_time: detail.casting_time,
            spell_range: detail.range,
            components: Some(detail.components.join(", ")),
            duration: detail.duration,
            school: detail.school.map(|s| s.name),
        },
    )
    .await
}

// A character's class must be one the reference API knows about.
pub async fn validate_gameclass(reference: &ReferenceClient, gameclass: &str) -> Result<()> {
    let classes = reference.classes().await?;
    if !classes.iter().any(|c| c.eq_ignore_ascii_case(gameclass)) {
        return Err(Error::InvalidClass(classes.join(", ")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::TRANSLATION_UNAVAILABLE;
    use crate::test_utils;
    use std::sync::atomic::Ordering;

    #[actix_web::test]
    async fn test_resolve_item_caches_once() {
        let database = "test_enrichment_resolve_item";
        let pool = test_utils::setup(database).await;
        let (upstream, hits) = test_utils::upstream();
        let reference = ReferenceClient::new(upstream.url(""));
        let translator = TranslationClient::new(upstream.url(""), Some("TESTKEY".into()));

        let first = resolve_item(&pool, &reference, &translator, "Greatsword")
            .await
            .unwrap();
        assert_eq!(first.api_index, "greatsword");
        assert!(!first.name_de.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // second resolution is served from the cache
        let second = resolve_item(&pool, &reference, &translator, "greatsword")
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let all = queries::fetch_items(&pool).await.unwrap();
        assert_eq!(all.len(), 1);

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_resolve_item_unknown_name() {
        let database = "test_enrichment_resolve_unknown";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let reference = ReferenceClient::new(upstream.url(""));
        let translator = TranslationClient::new(upstream.url(""), Some("TESTKEY".into()));

        let result = resolve_item(&pool, &reference, &translator, "Vorpal Blade").await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_resolve_spell_translates_fields() {
        let database = "test_enrichment_resolve_spell";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let reference = ReferenceClient::new(upstream.url(""));
        let translator = TranslationClient::new(upstream.url(""), Some("TESTKEY".into()));

        let spell = resolve_spell(&pool, &reference, &translator, "Magic Missile")
            .await
            .unwrap();

        assert_eq!(spell.api_index, "magic-missile");
        assert_eq!(spell.level, Some(1));
        assert_eq!(spell.school.as_deref(), Some("Evocation"));
        assert!(spell.name_de.contains("Magic Missile"));
        assert_ne!(spell.name_de, TRANSLATION_UNAVAILABLE);

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_resolve_item_without_translation_key() {
        let database = "test_enrichment_no_key";
        let pool = test_utils::setup(database).await;
        let (upstream, _hits) = test_utils::upstream();
        let reference = ReferenceClient::new(upstream.url(""));
        let translator = TranslationClient::new(upstream.url(""), None);

        let item = resolve_item(&pool, &reference, &translator, "Greatsword")
            .await
            .unwrap();
        assert_eq!(item.name_de, TRANSLATION_UNAVAILABLE);

        test_utils::teardown(database);
    }

    #[actix_web::test]
    async fn test_validate_gameclass() {
        let (upstream, _hits) = test_utils::upstream();
        let reference = ReferenceClient::new(upstream.url(""));

        assert!(validate_gameclass(&reference, "Fighter").await.is_ok());
        assert!(validate_gameclass(&reference, "fighter").await.is_ok());

        let result = validate_gameclass(&reference, "Jester").await;
        assert!(matches!(result, Err(Error::InvalidClass(_))));
    }
}
