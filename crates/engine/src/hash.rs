// Code-default fingerprints for drift detection

use std::fmt::Write as _;

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Deterministic fingerprint of a code default: SHA-256 over the compact
/// JSON serialization, lowercase hex.
///
/// Only ever applied to code defaults. Object key order is stable because
/// defaults are constructed by code, not reparsed from arbitrary input.
pub fn fingerprint(value: &Value) -> String {
    let digest = Sha256::digest(value.to_string().as_bytes());
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
