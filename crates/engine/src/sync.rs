// Forward-sync of code defaults

use crate::flags::FeatureFlagSource;
use crate::hash::fingerprint;
use crate::model::Definition;
use crate::registry::DefinitionRegistry;
use crate::resolve::effective_default;
use crate::store::{self, PersistentStore, StoreError};

/// Counts from one sync pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub updated: usize,
    pub preserved: usize,
    pub failed: usize,
}

enum SyncAction {
    Updated,
    Preserved,
}

/// Push current code defaults forward for every registered key.
///
/// Never-customized keys (no record, or `panel_saved == false`) are
/// overwritten unconditionally so they track code as it evolves.
/// Panel-saved keys are refreshed only when the fingerprint taken at save
/// time still matches the current default; anything else is presumed an
/// intentional human divergence and left untouched.
///
/// Per-key failures are logged, counted, and skipped; the pass never
/// aborts as a whole.
pub(crate) fn sync_all<S, F>(registry: &DefinitionRegistry, store: &mut S, flags: &F) -> SyncOutcome
where
    S: PersistentStore,
    F: FeatureFlagSource,
{
    let mut outcome = SyncOutcome::default();

    for definition in registry.all() {
        match sync_key(definition, store, flags) {
            Ok(SyncAction::Updated) => outcome.updated += 1,
            Ok(SyncAction::Preserved) => outcome.preserved += 1,
            Err(e) => {
                tracing::warn!(key = %definition.key, error = %e, "sync failed for key, continuing");
                outcome.failed += 1;
            }
        }
    }

    outcome
}

fn sync_key<S, F>(definition: &Definition, store: &mut S, flags: &F) -> Result<SyncAction, StoreError>
where
    S: PersistentStore,
    F: FeatureFlagSource,
{
    let default = effective_default(definition, flags);

    let record = match store::read_record(store, &definition.key)? {
        Some(record) => record,
        None => {
            store.set(&store::value_key(&definition.key), &default)?;
            return Ok(SyncAction::Updated);
        }
    };

    if !record.panel_saved {
        store.set(&store::value_key(&definition.key), &default)?;
        return Ok(SyncAction::Updated);
    }

    let current = fingerprint(&default);
    match record.code_hash_at_save.as_deref() {
        // The operator saved exactly what code produced at the time, so a
        // refresh cannot destroy an intentional edit. Restamp the hash.
        Some(saved) if saved == current => {
            store::write_panel_record(store, &definition.key, &default, &current)?;
            Ok(SyncAction::Updated)
        }
        // Divergent value, or unknown provenance: leave it alone until an
        // explicit reset.
        _ => Ok(SyncAction::Preserved),
    }
}
