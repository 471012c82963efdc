//! Argon2id hashing for passwords and one-time tokens
//!
//! Verification tokens are stored the same way as passwords: only the hash
//! reaches the database, the plain value goes to the account holder.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use kanbon_core::value_objects::generate_token;
use kanbon_core::DomainError;

use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;

/// Hash a secret with a fresh salt
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_secret(secret: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(anyhow::anyhow!("secret hashing failed: {e}")))
}

/// Check a secret against a stored PHC hash string
///
/// # Errors
/// Returns an error if the stored hash cannot be parsed
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("malformed secret hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

/// A freshly generated one-time token and its stored form
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Delivered to the account holder, never stored
    pub plain: String,
    pub hash: String,
}

/// Password and token hashing, injected into services
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_secret(password)
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        verify_secret(password, hash)
    }

    /// # Errors
    /// Returns `AppError::InvalidCredentials` if the password doesn't match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if self.verify(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    /// Generate a random token and hash it for storage
    pub fn issue_token(&self) -> Result<IssuedToken, AppError> {
        let plain = generate_token();
        let hash = hash_secret(&plain)?;
        Ok(IssuedToken { plain, hash })
    }
}

/// Require at least 8 characters with upper case, lower case and a digit
///
/// # Errors
/// Returns `DomainError::WeakPassword` naming the first unmet rule
pub fn validate_password_strength(password: &str) -> Result<(), DomainError> {
    let rules: [(bool, &str); 4] = [
        (
            password.chars().count() >= MIN_PASSWORD_LEN,
            "must be at least 8 characters long",
        ),
        (
            password.chars().any(char::is_uppercase),
            "must contain an uppercase letter",
        ),
        (
            password.chars().any(char::is_lowercase),
            "must contain a lowercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "must contain a digit",
        ),
    ];

    match rules.iter().find(|(ok, _)| !ok) {
        Some((_, message)) => Err(DomainError::WeakPassword((*message).to_string())),
        None => Ok(()),
    }
}
