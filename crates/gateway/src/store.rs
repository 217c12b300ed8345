//! Untyped document storage backends.
//!
//! Each record is a JSON object plus three row columns: `id`,
//! `created_at` and `updated_at`. Backends know nothing about record
//! types; [`Repository`](crate::Repository) does the (de)serialization.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::Result;
use crate::query::{Criteria, SortSpec};

/// The record kinds the gateway stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Product,
    Event,
    Booking,
    Order,
}

impl Collection {
    pub const ALL: [Self; 4] = [Self::Product, Self::Event, Self::Booking, Self::Order];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Event => "event",
            Self::Booking => "booking",
            Self::Order => "order",
        }
    }

    /// Fully qualified `PostgreSQL` table.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Product => "portell.product",
            Self::Event => "portell.event",
            Self::Booking => "portell.booking",
            Self::Order => r#"portell."order""#,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A document as the backend returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: Map<String, Value>,
}

/// Outcome of [`DocumentStore::increment_bounded`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoundedIncrement {
    /// The counter was raised; here is the updated document.
    Applied(StoredDocument),
    /// The ceiling would have been crossed. Carries the current counter and
    /// ceiling as read by the backend.
    Rejected { current: i64, ceiling: i64 },
    /// No document with that id.
    Missing,
}

/// Storage backend for JSON documents.
///
/// Every call is a fresh round-trip; implementations must not cache reads.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents matching `criteria`, ordered by `sort`, at most `limit`.
    async fn find(
        &self,
        collection: Collection,
        criteria: &Criteria,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> Result<Vec<StoredDocument>>;

    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDocument>>;

    /// Insert a new document and assign its id and timestamps.
    async fn insert(&self, collection: Collection, data: Map<String, Value>)
    -> Result<StoredDocument>;

    /// Shallow-merge `patch` into the stored document (top-level keys in
    /// `patch` replace stored ones). Returns `None` when the id is unknown.
    async fn merge(
        &self,
        collection: Collection,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> Result<Option<StoredDocument>>;

    /// Returns whether a document was removed. Nothing else is touched.
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool>;

    /// Atomically add `by` to the integer `field` unless the result would
    /// exceed the integer `ceiling_field` of the same document.
    async fn increment_bounded(
        &self,
        collection: Collection,
        id: Uuid,
        field: &str,
        by: i64,
        ceiling_field: &str,
    ) -> Result<BoundedIncrement>;

    /// Cheap liveness probe for readiness checks.
    async fn ping(&self) -> Result<()>;
}

impl std::fmt::Debug for dyn DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DocumentStore")
    }
}

/// Drop keys that belong to the row rather than the document.
pub(crate) fn strip_system_fields(data: &mut Map<String, Value>) {
    for key in crate::query::SYSTEM_FIELDS {
        data.remove(*key);
    }
}
