//! `panelconf-engine` - configuration reconciliation engine.
//!
//! Application code declares default values for named options; an operator
//! may override them through an admin panel; sync and reset keep the two
//! sources from permanently diverging as code evolves. Pure engine crate:
//! persistence and feature flags are traits, no IO or CLI dependencies.

pub mod engine;
pub mod error;
pub mod flags;
pub mod hash;
pub mod manifest;
pub mod model;
pub mod panel;
pub mod registry;
pub mod reset;
pub mod resolve;
pub mod sanitize;
pub mod store;
pub mod sync;

pub use engine::Engine;
pub use error::ConfigError;
pub use flags::{FeatureFlagSource, NoFlags, StaticFlags};
pub use hash::fingerprint;
pub use manifest::Manifest;
pub use model::{Definition, FieldType, Mode, StoredValue};
pub use panel::BatchOutcome;
pub use registry::DefinitionRegistry;
pub use reset::ResetOutcome;
pub use sanitize::{sanitize, SanitizeWarning};
pub use store::{read_record, MemoryStore, PersistentStore, StoreError};
pub use sync::SyncOutcome;
