//! Admin authentication service.
//!
//! Login goes through the [`Authenticator`] trait so the credential source can
//! change without touching the routes. The shipped implementation checks a
//! single username against an argon2 hash from configuration.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::CredentialConfig;

/// What the login form submits.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// Session-stored admin identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub username: String,
    pub logged_in_at: DateTime<Utc>,
}

/// Checks login credentials.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify `credentials` and describe the admin they belong to.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when they do not match.
    async fn authenticate(&self, credentials: &Credentials) -> Result<AdminSession, AuthError>;
}

/// One back-office account whose password hash lives in configuration.
pub struct StaticCredentialAuthenticator {
    username: String,
    password_hash: SecretString,
}

impl StaticCredentialAuthenticator {
    #[must_use]
    pub fn new(config: &CredentialConfig) -> Self {
        Self {
            username: config.username.clone(),
            password_hash: config.password_hash.clone(),
        }
    }
}

#[async_trait]
impl Authenticator for StaticCredentialAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AdminSession, AuthError> {
        let username_matches = credentials.username.trim() == self.username;
        // Always verify so a wrong username costs the same as a wrong password.
        let password_matches = verify_password(
            credentials.password.expose_secret(),
            self.password_hash.expose_secret(),
        );

        match password_matches {
            Ok(()) if username_matches => Ok(AdminSession {
                username: self.username.clone(),
                logged_in_at: Utc::now(),
            }),
            Err(AuthError::MalformedHash) => Err(AuthError::MalformedHash),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

/// Hash a password into an argon2 PHC string.
///
/// # Errors
///
/// Returns [`AuthError::Hashing`] if argon2 fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against a PHC string.
///
/// # Errors
///
/// Returns [`AuthError::MalformedHash`] for an unparseable hash and
/// [`AuthError::InvalidCredentials`] for a wrong password.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::MalformedHash)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn authenticator(password: &str) -> StaticCredentialAuthenticator {
        StaticCredentialAuthenticator::new(&CredentialConfig {
            username: "admin".to_owned(),
            password_hash: SecretString::from(hash_password(password).unwrap()),
        })
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_owned(),
            password: SecretString::from(password),
        }
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("winnica-2024").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("winnica-2024", &hash).is_ok());
        assert!(matches!(
            verify_password("winnica-2025", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_against_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "123456"),
            Err(AuthError::MalformedHash)
        ));
    }

    #[tokio::test]
    async fn test_static_authenticator() {
        let auth = authenticator("winnica-2024");

        let session = auth
            .authenticate(&credentials(" admin ", "winnica-2024"))
            .await
            .unwrap();
        assert_eq!(session.username, "admin");

        assert!(matches!(
            auth.authenticate(&credentials("Admin", "winnica-2024")).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.authenticate(&credentials("admin", "123456")).await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
