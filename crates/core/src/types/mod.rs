//! Core value types for Portell.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod language;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use language::Language;
pub use money::{CURRENCY, format_pln};
pub use status::*;
