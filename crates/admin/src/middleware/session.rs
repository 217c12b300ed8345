//! Admin sessions.
//!
//! Same table as the storefront sessions, told apart by cookie name. The
//! cookie is `SameSite=Strict` and idles out after a day.

use sqlx::PgPool;
use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "portell_admin_session";

const IDLE_EXPIRY: Duration = Duration::hours(24);

/// Session layer backed by `PostgreSQL`.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> SessionManagerLayer<PostgresStore> {
    session_layer(
        PostgresStore::new(pool.clone()),
        config.base_url.starts_with("https://"),
    )
}

/// Session layer over any store. Tests pass `tower_sessions::MemoryStore`.
#[must_use]
pub fn session_layer<S: SessionStore + Clone>(store: S, secure: bool) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(IDLE_EXPIRY))
        .with_secure(secure)
        .with_same_site(SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
