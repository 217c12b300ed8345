//! HTTP middleware for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (added by the binary)
//! 2. `TraceLayer` (request tracing with status and latency)
//! 3. Session layer (tower-sessions, SameSite=Strict)
//!
//! Authentication is enforced per handler with the [`RequireAdmin`] extractor.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use session::{SESSION_COOKIE_NAME, create_session_layer, session_layer};
