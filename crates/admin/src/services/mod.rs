//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Login against configured credentials

pub mod auth;

pub use auth::{AdminSession, AuthError, Authenticator, Credentials, StaticCredentialAuthenticator};
