//! Hash helpers for session key material.
//!
//! [`key_fingerprint`] gives operators a short identifier for the active key
//! that is safe to log at startup.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256, Sha512};

const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 of the key's signing half, hex encoded.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use speech_portal::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<_>>())
}

/// Expand arbitrary key material to the 64 bytes `Key::derive_from` accepts.
pub(super) fn stretch(material: &[u8]) -> [u8; 64] {
    let mut stretched = [0_u8; 64];
    stretched.copy_from_slice(&Sha512::digest(material));
    stretched
}
