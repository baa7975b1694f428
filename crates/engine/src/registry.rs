// Definition catalog, populated once at bootstrap

use std::collections::HashMap;

use crate::model::Definition;

/// Catalog of registered option definitions, in registration order.
///
/// An explicit value constructed at boot and handed to the engine; there
/// is no process-wide static. Registration order is preserved because the
/// panel groups fields in the order code declared them. Not safe for
/// concurrent registration; bootstrap precedes request handling.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    order: Vec<String>,
    by_key: HashMap<String, Definition>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite by key. Last registration wins; re-registering
    /// keeps the original position.
    pub fn register(&mut self, definition: Definition) {
        if !self.by_key.contains_key(&definition.key) {
            self.order.push(definition.key.clone());
        }
        self.by_key.insert(definition.key.clone(), definition);
    }

    pub fn get(&self, key: &str) -> Option<&Definition> {
        self.by_key.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// All definitions in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Definition> + '_ {
        self.order.iter().filter_map(|key| self.by_key.get(key))
    }

    /// Definitions belonging to one panel section, in registration order.
    pub fn section<'a>(&'a self, slug: &'a str) -> impl Iterator<Item = &'a Definition> + 'a {
        self.all().filter(move |d| d.section == slug)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;
    use serde_json::json;

    fn def(key: &str, section: &str) -> Definition {
        Definition::new(key, FieldType::Text, section, json!(""))
    }

    #[test]
    fn preserves_registration_order() {
        let mut registry = DefinitionRegistry::new();
        registry.register(def("b", "general"));
        registry.register(def("a", "general"));
        registry.register(def("c", "colors"));

        let keys: Vec<&str> = registry.all().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn last_registration_wins_without_reordering() {
        let mut registry = DefinitionRegistry::new();
        registry.register(def("a", "general"));
        registry.register(def("b", "general"));
        registry.register(Definition::new("a", FieldType::Number, "general", json!(5)));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").unwrap().field_type, FieldType::Number);
        let keys: Vec<&str> = registry.all().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn section_filters_by_slug() {
        let mut registry = DefinitionRegistry::new();
        registry.register(def("a", "general"));
        registry.register(def("b", "colors"));
        registry.register(def("c", "general"));

        let keys: Vec<&str> = registry.section("general").map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(registry.section("missing").count(), 0);
    }
}
