//! Request key derivation for the addressable image endpoint

use sha2::{Digest, Sha256};

use crate::models::GenerationPayload;

/// Hex characters kept from the digest
pub const REQUEST_KEY_LEN: usize = 16;

/// Deterministic key for `payload`: the first 16 hex characters of the
/// SHA-256 of its JSON form.
///
/// The addressable endpoints accept any key; this is only what this service
/// hands out when it stores a payload on the caller's behalf.
pub fn derive_request_key(payload: &GenerationPayload) -> String {
    // Struct serialisation has a fixed field order, so equal payloads hash equally.
    let canonical = serde_json::to_vec(payload).unwrap_or_default();
    let digest = Sha256::digest(&canonical);
    let mut key = hex::encode(digest);
    key.truncate(REQUEST_KEY_LEN);
    key
}
