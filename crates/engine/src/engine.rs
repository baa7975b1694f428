// Engine facade: registry + store + flags + read cache

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::error::ConfigError;
use crate::flags::FeatureFlagSource;
use crate::model::Mode;
use crate::panel::{self, BatchOutcome};
use crate::registry::DefinitionRegistry;
use crate::reset::{self, ResetOutcome};
use crate::resolve;
use crate::store::PersistentStore;
use crate::sync::{self, SyncOutcome};

/// Facade over the registry, store, and flag source.
///
/// `resolve` is the hot path (called once per touched key on every render)
/// and reads through a small in-memory cache. Every write path clears the
/// cache before returning, so the next resolve always sees fresh data. The
/// cache is a performance aid, not a correctness requirement.
pub struct Engine<S, F> {
    registry: DefinitionRegistry,
    store: S,
    flags: F,
    mode: Mode,
    cache: RefCell<HashMap<String, Value>>,
}

impl<S, F> Engine<S, F>
where
    S: PersistentStore,
    F: FeatureFlagSource,
{
    pub fn new(registry: DefinitionRegistry, store: S, flags: F, mode: Mode) -> Self {
        Self {
            registry,
            store,
            flags,
            mode,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.cache.borrow_mut().clear();
    }

    /// Tear down the facade, keeping the store (tests rebuild the engine
    /// against the same store to model a code deploy).
    pub fn into_store(self) -> S {
        self.store
    }

    /// Resolve the effective value of one key. Read-only.
    pub fn resolve(&self, key: &str) -> Result<Value, ConfigError> {
        if let Some(hit) = self.cache.borrow().get(key) {
            return Ok(hit.clone());
        }
        let value = resolve::resolve(&self.registry, &self.store, &self.flags, self.mode, key)?;
        self.cache.borrow_mut().insert(key.to_string(), value.clone());
        Ok(value)
    }

    /// Apply a panel submission. See [`crate::panel::apply_batch`].
    pub fn apply_batch(&mut self, submitted: &HashMap<String, Value>) -> Result<BatchOutcome, ConfigError> {
        self.cache.borrow_mut().clear();
        panel::apply_batch(&self.registry, &mut self.store, &self.flags, submitted)
    }

    /// Reset one key to its current effective default.
    pub fn reset_key(&mut self, key: &str) -> Result<ResetOutcome, ConfigError> {
        self.cache.borrow_mut().clear();
        reset::reset_key(&self.registry, &mut self.store, &self.flags, key)
    }

    /// Reset every key in a panel section.
    pub fn reset_section(&mut self, slug: &str) -> Result<ResetOutcome, ConfigError> {
        self.cache.borrow_mut().clear();
        reset::reset_section(&self.registry, &mut self.store, &self.flags, slug)
    }

    /// Push current code defaults forward. Partial-failure tolerant.
    pub fn sync_all(&mut self) -> SyncOutcome {
        self.cache.borrow_mut().clear();
        sync::sync_all(&self.registry, &mut self.store, &self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::NoFlags;
    use crate::model::{Definition, FieldType};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn engine() -> Engine<MemoryStore, NoFlags> {
        let mut registry = DefinitionRegistry::new();
        registry.register(Definition::new("site_title", FieldType::Text, "general", json!("My Site")));
        Engine::new(registry, MemoryStore::new(), NoFlags, Mode::Production)
    }

    #[test]
    fn writes_invalidate_the_read_cache() {
        let mut engine = engine();
        assert_eq!(engine.resolve("site_title").unwrap(), json!("My Site"));

        let submitted = HashMap::from([("site_title".to_string(), json!("Custom"))]);
        engine.apply_batch(&submitted).unwrap();
        assert_eq!(engine.resolve("site_title").unwrap(), json!("Custom"));

        engine.reset_key("site_title").unwrap();
        assert_eq!(engine.resolve("site_title").unwrap(), json!("My Site"));
    }

    #[test]
    fn resolve_is_served_from_cache_after_first_read() {
        let engine = engine();
        engine.resolve("site_title").unwrap();
        assert!(engine.cache.borrow().contains_key("site_title"));
    }
}
