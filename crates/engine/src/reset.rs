// Reset keys back to code-owned status

use crate::error::ConfigError;
use crate::flags::FeatureFlagSource;
use crate::model::Definition;
use crate::registry::DefinitionRegistry;
use crate::resolve::effective_default;
use crate::store::{self, PersistentStore};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResetOutcome {
    pub reset: usize,
}

/// Reset one key to its current effective default and clear its panel
/// metadata. Idempotent. Unknown keys are an error.
pub(crate) fn reset_key<S, F>(
    registry: &DefinitionRegistry,
    store: &mut S,
    flags: &F,
    key: &str,
) -> Result<ResetOutcome, ConfigError>
where
    S: PersistentStore,
    F: FeatureFlagSource,
{
    let definition = registry
        .get(key)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    reset_definition(definition, store, flags)?;
    Ok(ResetOutcome { reset: 1 })
}

/// Reset every key in a panel section. A slug matching nothing resets
/// zero keys and is not an error.
pub(crate) fn reset_section<S, F>(
    registry: &DefinitionRegistry,
    store: &mut S,
    flags: &F,
    slug: &str,
) -> Result<ResetOutcome, ConfigError>
where
    S: PersistentStore,
    F: FeatureFlagSource,
{
    let mut reset = 0;
    for definition in registry.section(slug) {
        reset_definition(definition, store, flags)?;
        reset += 1;
    }
    Ok(ResetOutcome { reset })
}

fn reset_definition<S, F>(definition: &Definition, store: &mut S, flags: &F) -> Result<(), ConfigError>
where
    S: PersistentStore,
    F: FeatureFlagSource,
{
    // Flag-driven defaults are honored here exactly as on the read path.
    let default = effective_default(definition, flags);
    store.set(&store::value_key(&definition.key), &default)?;
    store::clear_meta(store, &definition.key)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{NoFlags, StaticFlags};
    use crate::model::FieldType;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn registry() -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new();
        registry.register(Definition::new("site_title", FieldType::Text, "general", json!("My Site")));
        registry.register(
            Definition::new("beta_header", FieldType::Checkbox, "general", json!(false))
                .with_feature_key("beta_header"),
        );
        registry.register(Definition::new("accent", FieldType::Color, "colors", json!("#fff")));
        registry
    }

    fn panel_save(store: &mut MemoryStore, key: &str, value: serde_json::Value) {
        store::write_panel_record(store, key, &value, "stale-hash").unwrap();
    }

    #[test]
    fn reset_key_restores_default_and_clears_meta() {
        let mut store = MemoryStore::new();
        panel_save(&mut store, "site_title", json!("Custom"));

        let outcome = reset_key(&registry(), &mut store, &NoFlags, "site_title").unwrap();
        assert_eq!(outcome, ResetOutcome { reset: 1 });

        let record = store::read_record(&store, "site_title").unwrap().unwrap();
        assert_eq!(record.value, json!("My Site"));
        assert!(!record.panel_saved);
        assert!(record.code_hash_at_save.is_none());
    }

    #[test]
    fn reset_key_is_idempotent() {
        let mut store = MemoryStore::new();
        panel_save(&mut store, "site_title", json!("Custom"));

        reset_key(&registry(), &mut store, &NoFlags, "site_title").unwrap();
        let once = store::read_record(&store, "site_title").unwrap();
        reset_key(&registry(), &mut store, &NoFlags, "site_title").unwrap();
        let twice = store::read_record(&store, "site_title").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn reset_honors_feature_flag_defaults() {
        let mut store = MemoryStore::new();
        panel_save(&mut store, "beta_header", json!(false));
        let mut flags = StaticFlags::new();
        flags.set("beta_header", true);

        reset_key(&registry(), &mut store, &flags, "beta_header").unwrap();
        let record = store::read_record(&store, "beta_header").unwrap().unwrap();
        assert_eq!(record.value, json!(true));
    }

    #[test]
    fn reset_section_touches_only_matching_keys() {
        let mut store = MemoryStore::new();
        panel_save(&mut store, "site_title", json!("Custom"));
        panel_save(&mut store, "accent", json!("#000"));

        let outcome = reset_section(&registry(), &mut store, &NoFlags, "general").unwrap();
        assert_eq!(outcome.reset, 2);

        let untouched = store::read_record(&store, "accent").unwrap().unwrap();
        assert_eq!(untouched.value, json!("#000"));
        assert!(untouched.panel_saved);
    }

    #[test]
    fn reset_section_with_no_matches_resets_nothing() {
        let mut store = MemoryStore::new();
        let outcome = reset_section(&registry(), &mut store, &NoFlags, "missing").unwrap();
        assert_eq!(outcome.reset, 0);
    }

    #[test]
    fn reset_unknown_key_is_an_error() {
        let mut store = MemoryStore::new();
        let err = reset_key(&registry(), &mut store, &NoFlags, "nope").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }
}
