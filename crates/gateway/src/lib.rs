//! Portell Winery data access gateway.
//!
//! Typed CRUD over products, events, bookings and orders, plus the outbound
//! integrations the storefront and admin share: email delivery and image
//! storage.
//!
//! # Modules
//!
//! - [`repository`] - `Repository<E>` and the [`Gateway`] bundle
//! - [`store`] - the untyped [`DocumentStore`] backend trait
//! - [`pg`] - `PostgreSQL` backend and migrations
//! - [`memory`] - in-memory backend for tests and local development
//! - [`query`] - [`SortSpec`] and [`Criteria`]
//! - [`mailer`] - the [`Mailer`](mailer::Mailer) trait and its transports
//! - [`storage`] - Supabase-compatible file storage
//! - [`env`] - environment readers for the binaries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod entity;
pub mod env;
pub mod error;
pub mod mailer;
pub mod memory;
pub mod pg;
pub mod query;
pub mod record;
pub mod repository;
pub mod storage;
pub mod store;

pub use entity::Entity;
pub use error::{GatewayError, Result};
pub use memory::MemoryStore;
pub use pg::{MIGRATOR, PgStore, create_pool};
pub use query::{Criteria, SortSpec};
pub use record::Record;
pub use repository::{Gateway, Repository};
pub use store::{Collection, DocumentStore};
