//! JSON API routes.
//!
//! - `email` - `/api/send-email`, raw email delivery for trusted callers

pub mod email;
