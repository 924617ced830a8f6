use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::{RestErr, RestResult};

/// Salted one-way hash of a user password, in PHC string form.
pub fn hash_password(plain: &str) -> RestResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            RestErr::internal("error when trying to hash password")
        })
}

/// `Ok(false)` on a plain mismatch; an unreadable stored hash is an internal error.
pub fn verify_password(plain: &str, stored: &str) -> RestResult<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash unreadable");
        RestErr::internal("error when trying to verify password")
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "password verification failed");
            Err(RestErr::internal("error when trying to verify password"))
        }
    }
}
