// Feature-flag lookup seam

use std::collections::HashMap;

/// Boolean override lookup by flag name. `None` means no override exists
/// and the literal code default stands.
pub trait FeatureFlagSource {
    fn get_override(&self, flag_key: &str) -> Option<bool>;
}

/// Flag source with no overrides.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFlags;

impl FeatureFlagSource for NoFlags {
    fn get_override(&self, _flag_key: &str) -> Option<bool> {
        None
    }
}

/// Fixed set of overrides, typically loaded from a manifest at startup.
#[derive(Debug, Default, Clone)]
pub struct StaticFlags {
    overrides: HashMap<String, bool>,
}

impl StaticFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(overrides: HashMap<String, bool>) -> Self {
        Self { overrides }
    }

    pub fn set(&mut self, flag_key: impl Into<String>, on: bool) {
        self.overrides.insert(flag_key.into(), on);
    }

    pub fn clear(&mut self, flag_key: &str) {
        self.overrides.remove(flag_key);
    }
}

impl FeatureFlagSource for StaticFlags {
    fn get_override(&self, flag_key: &str) -> Option<bool> {
        self.overrides.get(flag_key).copied()
    }
}
