// Panel batch writes

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ConfigError;
use crate::flags::FeatureFlagSource;
use crate::hash::fingerprint;
use crate::registry::DefinitionRegistry;
use crate::resolve::effective_default;
use crate::sanitize::{sanitize, SanitizeWarning};
use crate::store::{self, PersistentStore};

/// Result of a panel batch submission.
#[derive(Debug, Default, PartialEq)]
pub struct BatchOutcome {
    pub saved: usize,
    pub skipped: usize,
    pub warnings: Vec<SanitizeWarning>,
}

/// Apply a panel submission.
///
/// Walks every registered definition, not just the submitted keys: an
/// absent checkbox is an explicit `false`, while absent non-boolean fields
/// are skipped and keep their prior stored value. Each saved key gets the
/// full record (value, `panel_saved`, and a fingerprint of the current
/// effective default for later drift detection).
///
/// There is no batch atomicity: a write failure surfaces immediately and
/// keys already written stay written. Each key's record is independently
/// self-consistent.
pub(crate) fn apply_batch<S, F>(
    registry: &DefinitionRegistry,
    store: &mut S,
    flags: &F,
    submitted: &HashMap<String, Value>,
) -> Result<BatchOutcome, ConfigError>
where
    S: PersistentStore,
    F: FeatureFlagSource,
{
    let mut outcome = BatchOutcome::default();

    for definition in registry.all() {
        let raw = match submitted.get(&definition.key) {
            Some(raw) => raw.clone(),
            None if definition.field_type.is_boolean_like() => Value::Bool(false),
            None => {
                outcome.skipped += 1;
                continue;
            }
        };

        let (clean, warning) = sanitize(definition.field_type, &raw);
        if let Some(message) = warning {
            outcome.warnings.push(SanitizeWarning {
                key: definition.key.clone(),
                field_type: definition.field_type,
                message,
            });
        }

        let code_hash = fingerprint(&effective_default(definition, flags));
        store::write_panel_record(store, &definition.key, &clean, &code_hash)?;
        outcome.saved += 1;
    }

    Ok(outcome)
}
