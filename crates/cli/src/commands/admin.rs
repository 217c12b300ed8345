//! Admin credential commands.
//!
//! The back-office has a single account configured through
//! `ADMIN_USERNAME` and `ADMIN_PASSWORD_HASH`; this prints the hash.

use portell_admin::services::auth::{self, AuthError};

/// Print an argon2 PHC string for `password` on stdout.
///
/// # Errors
///
/// Returns an error if the password is empty or hashing fails.
pub fn hash_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Hashing("password must not be empty".to_owned()));
    }
    let hash = auth::hash_password(password)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{hash}");
    }
    tracing::info!("Set ADMIN_PASSWORD_HASH to the line above (quote it in .env)");
    Ok(())
}
