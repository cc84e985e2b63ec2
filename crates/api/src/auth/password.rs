//! Crew account passwords.
//!
//! A super admin sets the initial password when creating a maker or checker;
//! login checks it against `users.password_hash` (Argon2id, PHC string).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// `Ok(false)` is a wrong password and counts toward the login lockout.
/// `Err` means the stored hash itself is unreadable.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let stored = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Length is counted in characters, not UTF-8 bytes.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    match password.chars().count() {
        n if n >= min_length => Ok(()),
        _ => Err(format!("Password must be at least {min_length} characters long")),
    }
}
