//! Argon2id password hashing. Stored hashes are PHC strings with the salt embedded.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::AppError;

/// Well-formed hash under the default parameters that no password matches.
/// Login verifies unknown usernames against it so both failure paths pay for one Argon2 run.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ueOTdz/W7BJlhYVxMWZRiw$3oIs68xS7yrbrMbxqtn4gHP20d24haEHOV43ENgfLyo";

pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| AppError::Server(anyhow::anyhow!("argon2 hashing failed: {e}")))
}

/// `Ok(false)` on a mismatch. Unreadable stored hashes are server errors, not bad credentials.
pub fn verify_password(plain: &str, phc: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| AppError::Server(anyhow::anyhow!("stored password hash is unreadable: {e}")))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Server(anyhow::anyhow!("argon2 verification failed: {e}"))),
    }
}
