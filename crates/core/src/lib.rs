//! Portell Core - domain types and logic for the Portell winery shop.
//!
//! This crate is shared by all Portell components:
//! - `gateway` - Persistence and outbound integrations
//! - `storefront` - Public shop, event booking and checkout
//! - `admin` - Back-office for products and events
//! - `cli` - Migrations, seeding and admin tooling
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. Anything that needs the current time or
//! randomness takes it as an argument.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email, language, money and status enums
//! - [`models`] - Product, Event, Booking and Order records
//! - [`cart`] - Session cart
//! - [`catalog`] - Listing filters, search and sorting
//! - [`reservation`] - Event booking form and checkout handoff
//! - [`checkout`] - Checkout wizard state machine
//! - [`codes`] - Confirmation codes and order numbers
//! - [`calendar`] - iCalendar export and calendar deep links
//! - [`recommend`] - Related event recommendations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod calendar;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod codes;
pub mod models;
pub mod recommend;
pub mod reservation;
pub mod types;
pub mod validation;

pub use types::*;
pub use validation::ValidationError;
