use std::fmt;

use crate::store::StoreError;

#[derive(Debug)]
pub enum ConfigError {
    /// No definition registered for this key.
    UnknownKey(String),
    /// Store write failure. Writes fail loudly; a silently dropped write
    /// is worse than a visible one.
    Store(StoreError),
    /// TOML parse / deserialization error in a definition manifest.
    ManifestParse(String),
    /// Manifest validation error (empty key, empty section, ...).
    ManifestValidation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "unknown option key: {key}"),
            Self::Store(e) => write!(f, "store error: {e}"),
            Self::ManifestParse(msg) => write!(f, "manifest parse error: {msg}"),
            Self::ManifestValidation(msg) => write!(f, "manifest validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ConfigError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
