//! # Password Hashing
//!
//! Argon2id hashes stored as PHC strings (`$argon2id$v=19$...`). The salt
//! and parameters live inside the string, so verification needs nothing else.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::{DbError, DbResult};

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored hash.
///
/// A malformed stored hash verifies as `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
