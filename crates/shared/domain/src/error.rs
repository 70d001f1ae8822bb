//! Domain-level errors.

use thiserror::Error;

use crate::constants::INVALID_LICENSE_MESSAGE;

/// Fleet rule violations and credential hashing failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// License number does not match the `AAA99999` format
    #[error("{}", INVALID_LICENSE_MESSAGE)]
    InvalidLicenseFormat,

    #[error("This password is too short. It must contain at least {min} characters.")]
    PasswordTooShort { min: usize },

    /// Argon2 failed to hash, or a stored hash could not be parsed
    #[error("Credential hashing failed: {0}")]
    Hashing(String),
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
