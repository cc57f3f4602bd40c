//! crates/rp_io/src/hasher.rs
//!
//! Deterministic hashing and ID builders for canonical artifacts.
//!
//! - Canonical JSON hashing: sorted object keys, array order preserved, compact.
//! - Plan IDs derive from canonical bytes: `PLAN:<64 lowercase hex>`.
//! - Use `sha256_canonical(..)` for JSON values/structs and `sha256_hex(..)` for raw bytes.

#![forbid(unsafe_code)]

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::IoError;

pub const PLAN_ID_PREFIX: &str = "PLAN:";

/// Lowercase hex SHA-256 of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(digest)
}

/// Lowercase hex SHA-256 of the canonical JSON form of `value`.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    let bytes = to_canonical_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// `PLAN:<hex>` over the canonical bytes of `value`.
pub fn plan_id<T: Serialize>(value: &T) -> Result<String, IoError> {
    Ok(format!("{PLAN_ID_PREFIX}{}", sha256_canonical(value)?))
}

/// Check the `PLAN:` prefix and the 64-hex body.
pub fn is_plan_id(s: &str) -> bool {
    s.strip_prefix(PLAN_ID_PREFIX)
        .map(|h| h.len() == 64 && h.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f')))
        .unwrap_or(false)
}
