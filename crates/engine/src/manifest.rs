// TOML definition manifests
//
// Bootstrap sugar for the CLI and deployment scripts; embedders normally
// register definitions programmatically.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;
use crate::flags::StaticFlags;
use crate::model::{Definition, FieldType};
use crate::registry::DefinitionRegistry;

/// A deployment's option definitions plus static feature-flag overrides.
///
/// ```toml
/// [flags]
/// beta_header = true
///
/// [[option]]
/// key = "site_title"
/// type = "text"
/// section = "general"
/// default = "My Site"
/// ```
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "option")]
    pub options: Vec<OptionEntry>,
    #[serde(default)]
    pub flags: HashMap<String, bool>,
}

#[derive(Debug, Deserialize)]
pub struct OptionEntry {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub section: String,
    #[serde(default)]
    pub sub_section: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub feature_key: Option<String>,
}

impl Manifest {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let manifest: Manifest =
            toml::from_str(input).map_err(|e| ConfigError::ManifestParse(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ManifestParse(format!("{}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for entry in &self.options {
            if entry.key.trim().is_empty() {
                return Err(ConfigError::ManifestValidation("option with an empty key".into()));
            }
            if entry.section.trim().is_empty() {
                return Err(ConfigError::ManifestValidation(format!(
                    "option '{}' has an empty section",
                    entry.key
                )));
            }
        }
        Ok(())
    }

    /// Build a registry from the entries, in file order.
    pub fn build_registry(&self) -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new();
        for entry in &self.options {
            registry.register(entry.to_definition());
        }
        registry
    }

    pub fn static_flags(&self) -> StaticFlags {
        StaticFlags::from_map(self.flags.clone())
    }
}

impl OptionEntry {
    fn to_definition(&self) -> Definition {
        Definition {
            key: self.key.clone(),
            field_type: self.field_type,
            section: self.section.clone(),
            sub_section: self.sub_section.clone(),
            label: self.label.clone().unwrap_or_else(|| self.key.clone()),
            description: self.description.clone(),
            default: self.default.as_ref().map(toml_to_json).unwrap_or(Value::Null),
            feature_key: self.feature_key.clone(),
        }
    }
}

fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::from(*i),
        toml::Value::Float(f) => Value::from(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table.iter().map(|(k, v)| (k.clone(), toml_to_json(v))).collect(),
        ),
    }
}
