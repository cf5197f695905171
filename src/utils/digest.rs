//! Short content digests used for fallback identifiers.

use sha2::{Digest, Sha256};

/// Version of the fallback identifier scheme.
///
/// Bump this whenever [`short_digest`] changes, since every hashed
/// document and chunk id changes with it.
pub const ID_SCHEME_VERSION: u32 = 1;

/// Number of digest bytes kept in fallback identifiers.
pub const SHORT_DIGEST_BYTES: usize = 8;

/// Truncated SHA-256 of `content` as lowercase hex.
pub fn short_digest(content: &str) -> String {
    let hash = Sha256::digest(content.as_bytes());
    hex::encode(&hash[..SHORT_DIGEST_BYTES])
}
