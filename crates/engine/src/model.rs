// Option definitions and the stored-value model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field type of a registered option.
///
/// Closed set: every variant has exactly one sanitizer in [`crate::sanitize`],
/// so adding a type is a compile-time change, not a runtime string switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    RichText,
    Checkbox,
    Select,
    Radio,
    Image,
    Color,
    Number,
    Schedule,
    RawJson,
    MenuStructure,
}

impl FieldType {
    /// Boolean-like fields are implied `false` when absent from a panel
    /// submission: an unchecked checkbox is an explicit negative.
    pub fn is_boolean_like(&self) -> bool {
        matches!(self, FieldType::Checkbox)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::RichText => "rich_text",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Image => "image",
            Self::Color => "color",
            Self::Number => "number",
            Self::Schedule => "schedule",
            Self::RawJson => "raw_json",
            Self::MenuStructure => "menu_structure",
        };
        write!(f, "{name}")
    }
}

/// A registered option: key, type, panel placement, and code default.
///
/// Created once at bootstrap and immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Panel section slug the option belongs to.
    pub section: String,
    #[serde(default)]
    pub sub_section: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Code default. May be superseded by a feature-flag override when
    /// `feature_key` is set (see [`crate::resolve`]).
    #[serde(default)]
    pub default: Value,
    #[serde(default)]
    pub feature_key: Option<String>,
}

impl Definition {
    pub fn new(
        key: impl Into<String>,
        field_type: FieldType,
        section: impl Into<String>,
        default: Value,
    ) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            field_type,
            section: section.into(),
            sub_section: None,
            description: None,
            default,
            feature_key: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_feature_key(mut self, feature_key: impl Into<String>) -> Self {
        self.feature_key = Some(feature_key.into());
        self
    }
}

/// Persisted state for one option, read back as a unit.
///
/// `code_hash_at_save` is always a fingerprint of a code default taken at
/// save/sync time, never a hash of the operator's value. It exists purely
/// to detect code drift later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    pub value: Value,
    pub panel_saved: bool,
    pub code_hash_at_save: Option<String>,
}

/// Runtime mode. In authoring mode a live feature-flag override wins over
/// any stored panel value, so developers can iterate without stale panel
/// data in the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Production,
    Authoring,
}
