//! One-way password digests

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hex encoded SHA-256 digest of `password`
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Check `password` against a stored hex digest
///
/// Stored digests are compared case-insensitively and in constant time.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let computed = hash_password(password);
    let stored = stored_hash.trim().to_ascii_lowercase();

    computed.as_bytes().ct_eq(stored.as_bytes()).into()
}
