//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Security headers (CSP, referrer policy, etc.)
//!
//! [`ClientState`] is an extractor rather than a layer: handlers that need
//! the cart or language ask for it.

pub mod client_state;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use client_state::{ClientEvent, ClientState};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, session_layer};
