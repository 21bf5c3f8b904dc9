//! Salted one-way password hashing (Argon2id).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::sync::OnceLock;

use crate::error::{DatabaseError, Result};

/// Hash checked against when no account matches, so a lookup miss costs the
/// same Argon2 work as a wrong password.
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Hash a password with a fresh random salt.
///
/// The returned PHC string embeds the algorithm, parameters and salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DatabaseError::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch; errors only if the stored hash is unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| DatabaseError::PasswordHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(DatabaseError::PasswordHash(e.to_string())),
    }
}

/// Run a full verification against a throwaway hash and discard the result.
pub fn verify_dummy(password: &str) {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
pub(crate) fn dummy_hash_ready() -> bool {
    DUMMY_HASH.get().is_some_and(Option::is_some)
}

fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash_password("no-account-matches-this-password").ok())
        .as_deref()
}
