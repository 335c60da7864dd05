//! Password hashing
//!
//! bcrypt hash + verify. Verification is constant-time with respect to
//! the stored hash; `equalize_verify` keeps the missing-user login path
//! from being distinguishable by timing.

use crate::error::Result;
use std::sync::OnceLock;

/// Hash a plaintext password with the default bcrypt cost
pub fn hash_password(plaintext: &str) -> Result<String> {
    Ok(bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)?)
}

/// Verify a plaintext password against a stored bcrypt hash.
/// A malformed hash counts as a failed verification.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

/// Burn a bcrypt verification against a throwaway hash so the
/// unknown-email login path costs the same as a real password check.
pub fn equalize_verify(plaintext: &str) {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    let hash = DUMMY_HASH
        .get_or_init(|| bcrypt::hash("kudos-timing-pad", bcrypt::DEFAULT_COST).unwrap_or_default());
    let _ = bcrypt::verify(plaintext, hash);
}
