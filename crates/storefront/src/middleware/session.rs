//! Visitor sessions.
//!
//! Anonymous visitors get a cookie on their first write; the session holds
//! their cart, language and checkout progress. Records live in the
//! `tower_sessions.session` table created by the migrations.

use sqlx::PgPool;
use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "portell_session";

/// A cart left alone for a week is dropped.
const IDLE_EXPIRY: Duration = Duration::days(7);

/// Session layer backed by `PostgreSQL`.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore> {
    session_layer(
        PostgresStore::new(pool.clone()),
        config.base_url.starts_with("https://"),
    )
}

/// Session layer over any store. Tests pass `tower_sessions::MemoryStore`.
///
/// `SameSite=Lax` keeps the cart when a visitor follows a link from an
/// email or a calendar entry.
#[must_use]
pub fn session_layer<S: SessionStore + Clone>(store: S, secure: bool) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(IDLE_EXPIRY))
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::Request, http::header, routing::get};
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, Session};

    use super::*;

    #[tokio::test]
    async fn test_cookie_attributes() {
        let app = Router::new()
            .route(
                "/",
                get(|session: Session| async move {
                    session.insert("lang", "en").await.unwrap();
                }),
            )
            .layer(session_layer(MemoryStore::default(), false));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("portell_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
    }
}
