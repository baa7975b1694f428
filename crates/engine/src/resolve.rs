// Effective-value resolution: the sole read path
//
// Precedence: live feature flag (authoring mode) > stored value > effective
// default. Centralized here so no consumer can reorder the chain.

use serde_json::Value;

use crate::error::ConfigError;
use crate::flags::FeatureFlagSource;
use crate::model::{Definition, Mode};
use crate::registry::DefinitionRegistry;
use crate::store::{self, PersistentStore};

/// Effective default for a definition: the code default, superseded by a
/// feature-flag override when `feature_key` is set and the flag source
/// returns a live value.
pub(crate) fn effective_default<F: FeatureFlagSource>(definition: &Definition, flags: &F) -> Value {
    if let Some(flag_key) = &definition.feature_key {
        if let Some(on) = flags.get_override(flag_key) {
            return Value::Bool(on);
        }
    }
    definition.default.clone()
}

/// Resolve the effective value of one key. Never mutates the store.
pub(crate) fn resolve<S, F>(
    registry: &DefinitionRegistry,
    store: &S,
    flags: &F,
    mode: Mode,
    key: &str,
) -> Result<Value, ConfigError>
where
    S: PersistentStore,
    F: FeatureFlagSource,
{
    let definition = registry
        .get(key)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    // In authoring mode a live flag override beats any stored panel value,
    // so developers iterating on flags are not blocked by stale panel data.
    if mode == Mode::Authoring {
        if let Some(flag_key) = &definition.feature_key {
            if let Some(on) = flags.get_override(flag_key) {
                return Ok(Value::Bool(on));
            }
        }
    }

    let fallback = effective_default(definition, flags);
    match store::read_record(store, key) {
        Ok(Some(record)) => Ok(record.value),
        Ok(None) => Ok(fallback),
        Err(e) => {
            // Reads fail closed: degrade to the effective default rather
            // than failing the render.
            tracing::warn!(key, error = %e, "store read failed, using effective default");
            Ok(fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{NoFlags, StaticFlags};
    use crate::model::FieldType;
    use crate::store::{MemoryStore, StoreError};
    use serde_json::json;

    struct BrokenStore;

    impl PersistentStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        fn set(&mut self, _key: &str, _value: &Value) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        fn delete(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    fn registry() -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new();
        registry.register(Definition::new("site_title", FieldType::Text, "general", json!("My Site")));
        registry.register(
            Definition::new("beta_header", FieldType::Checkbox, "general", json!(false))
                .with_feature_key("beta_header"),
        );
        registry
    }

    #[test]
    fn unknown_key_is_an_error() {
        let store = MemoryStore::new();
        let err = resolve(&registry(), &store, &NoFlags, Mode::Production, "nope").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(key) if key == "nope"));
    }

    #[test]
    fn missing_record_falls_back_to_code_default() {
        let store = MemoryStore::new();
        let value = resolve(&registry(), &store, &NoFlags, Mode::Production, "site_title").unwrap();
        assert_eq!(value, json!("My Site"));
    }

    #[test]
    fn flag_override_replaces_the_default() {
        let store = MemoryStore::new();
        let mut flags = StaticFlags::new();
        flags.set("beta_header", true);
        let value = resolve(&registry(), &store, &flags, Mode::Production, "beta_header").unwrap();
        assert_eq!(value, json!(true));
    }

    #[test]
    fn stored_value_beats_flag_default_in_production() {
        let mut store = MemoryStore::new();
        store.set(&store::value_key("beta_header"), &json!(false)).unwrap();
        let mut flags = StaticFlags::new();
        flags.set("beta_header", true);
        let value = resolve(&registry(), &store, &flags, Mode::Production, "beta_header").unwrap();
        assert_eq!(value, json!(false));
    }

    #[test]
    fn authoring_mode_flag_override_beats_stored_value() {
        let mut store = MemoryStore::new();
        store.set(&store::value_key("beta_header"), &json!(false)).unwrap();
        let mut flags = StaticFlags::new();
        flags.set("beta_header", true);
        let value = resolve(&registry(), &store, &flags, Mode::Authoring, "beta_header").unwrap();
        assert_eq!(value, json!(true));
    }

    #[test]
    fn authoring_mode_without_live_flag_reads_the_store() {
        let mut store = MemoryStore::new();
        store.set(&store::value_key("beta_header"), &json!(true)).unwrap();
        let value = resolve(&registry(), &store, &NoFlags, Mode::Authoring, "beta_header").unwrap();
        assert_eq!(value, json!(true));
    }

    #[test]
    fn read_failures_degrade_to_the_default() {
        let value = resolve(&registry(), &BrokenStore, &NoFlags, Mode::Production, "site_title").unwrap();
        assert_eq!(value, json!("My Site"));
    }
}
