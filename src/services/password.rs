// SPDX-License-Identifier: MIT

//! Password hashing and verification (Argon2id, PHC-format strings).
//!
//! Used for local credentials, and reused as an identity-binding check for
//! OAuth-provisioned users: their stored hash is `hash(provider subject id)`,
//! verified on every bridge login. That value is a provisioning artifact, not
//! a secret a user knows.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
/// Returns `Ok(false)` on mismatch, `Err` only if the stored hash is malformed.
pub fn verify_password(password: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("invalid stored password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
