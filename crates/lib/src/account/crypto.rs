//! Password hashing for accounts
//!
//! Passwords are hashed with Argon2id and stored in PHC string format, which
//! embeds the salt and parameters.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

use super::errors::AccountError;
use crate::Result;

/// Hash a password using Argon2id
///
/// # Returns
/// The PHC-format hash string, salt included
pub fn hash_password(password: impl AsRef<str>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map_err(|e| AccountError::PasswordHashingFailed {
            reason: e.to_string(),
        })?
        .to_string();

    Ok(hash)
}

/// Verify a password against its stored hash
///
/// # Returns
/// Ok(()) if password is correct, `AccountError::InvalidPassword` otherwise
pub fn verify_password(password: impl AsRef<str>, password_hash: impl AsRef<str>) -> Result<()> {
    let parsed_hash = PasswordHash::new(password_hash.as_ref())
        .map_err(|_| AccountError::PasswordVerificationFailed)?;

    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed_hash)
        .map_err(|_| AccountError::InvalidPassword.into())
}
