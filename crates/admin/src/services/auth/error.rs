//! Admin authentication error types.

use thiserror::Error;

/// Errors that can occur during admin authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately does not say which.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The configured hash could not be parsed.
    #[error("stored password hash is malformed")]
    MalformedHash,

    /// Hashing a new password failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}
