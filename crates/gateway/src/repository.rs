//! Typed repositories over a [`DocumentStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use portell_core::models::{Booking, Event, Order, Product};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::entity::Entity;
use crate::error::{GatewayError, Result};
use crate::memory::MemoryStore;
use crate::pg::PgStore;
use crate::query::{Criteria, SYSTEM_FIELDS, SortSpec};
use crate::record::Record;
use crate::store::{BoundedIncrement, DocumentStore};

/// CRUD access to one record kind.
pub struct Repository<E: Entity> {
    store: Arc<dyn DocumentStore>,
    _kind: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _kind: PhantomData,
        }
    }
}

impl<E: Entity> std::fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &E::COLLECTION)
            .finish_non_exhaustive()
    }
}

impl<E: Entity> Repository<E> {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// All records ordered by `sort`, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sort field is unknown or the backend fails.
    pub async fn list(&self, sort: &SortSpec, limit: Option<usize>) -> Result<Vec<Record<E>>> {
        self.filter(&Criteria::new(), sort, limit).await
    }

    /// Records matching every condition in `criteria`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownField`] if a filter or sort field is not
    /// part of the record kind, or the backend's error.
    #[instrument(skip(self, criteria), fields(collection = %E::COLLECTION))]
    pub async fn filter(
        &self,
        criteria: &Criteria,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> Result<Vec<Record<E>>> {
        for field in criteria.fields().chain(std::iter::once(sort.field.as_str())) {
            check_field::<E>(field)?;
        }
        let docs = self
            .store
            .find(E::COLLECTION, criteria, sort, limit)
            .await?;
        docs.into_iter().map(Record::decode).collect()
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] when the id is unknown.
    pub async fn get(&self, id: E::Id) -> Result<Record<E>> {
        self.find_optional(id)
            .await?
            .ok_or_else(|| not_found::<E>(id))
    }

    /// Fetch one record, `None` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn find_optional(&self, id: E::Id) -> Result<Option<Record<E>>> {
        self.store
            .get(E::COLLECTION, id.into())
            .await?
            .map(Record::decode)
            .transpose()
    }

    /// Insert a new record and return it with its assigned id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    #[instrument(skip(self, payload), fields(collection = %E::COLLECTION))]
    pub async fn create(&self, payload: &E) -> Result<Record<E>> {
        let data = to_object(payload)?;
        let doc = self.store.insert(E::COLLECTION, data).await?;
        let record = Record::decode(doc)?;
        tracing::debug!(id = %record.id, "Record created");
        Ok(record)
    }

    /// Shallow-merge `patch` into the stored record.
    ///
    /// `patch` is anything that serializes to a JSON object: a full `E`, a
    /// `serde_json::Map`, or a small struct of changed fields.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownField`] for keys the record kind does not
    /// have, [`GatewayError::NotFound`] when the id is unknown, or the
    /// backend's error.
    #[instrument(skip(self, patch), fields(collection = %E::COLLECTION))]
    pub async fn update<P: Serialize + Sync>(&self, id: E::Id, patch: &P) -> Result<Record<E>> {
        let patch = to_object(patch)?;
        for field in patch.keys() {
            if !E::FIELDS.contains(&field.as_str()) {
                return Err(GatewayError::UnknownField {
                    collection: E::COLLECTION.name(),
                    field: field.clone(),
                });
            }
        }
        let doc = self
            .store
            .merge(E::COLLECTION, id.into(), patch)
            .await?
            .ok_or_else(|| not_found::<E>(id))?;
        Record::decode(doc)
    }

    /// Remove a record. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    #[instrument(skip(self), fields(collection = %E::COLLECTION))]
    pub async fn delete(&self, id: E::Id) -> Result<bool> {
        self.store.delete(E::COLLECTION, id.into()).await
    }
}

impl Repository<Event> {
    /// Add `guests` to `booked_count` only if the result stays within
    /// `capacity`, as a single backend operation.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CapacityExceeded`] when the event has fewer
    /// spots left than requested, [`GatewayError::NotFound`] when the id is
    /// unknown, or the backend's error.
    #[instrument(skip(self))]
    pub async fn reserve_seats(
        &self,
        id: portell_core::EventId,
        guests: u32,
    ) -> Result<Record<Event>> {
        let outcome = self
            .store
            .increment_bounded(
                Event::COLLECTION,
                id.into(),
                "booked_count",
                i64::from(guests),
                "capacity",
            )
            .await?;
        match outcome {
            BoundedIncrement::Applied(doc) => Record::decode(doc),
            BoundedIncrement::Rejected { current, ceiling } => {
                tracing::warn!(%id, guests, current, ceiling, "Seat reservation rejected");
                Err(GatewayError::CapacityExceeded {
                    requested: i64::from(guests),
                    available: (ceiling - current).max(0),
                })
            }
            BoundedIncrement::Missing => Err(not_found::<Event>(id)),
        }
    }
}

fn check_field<E: Entity>(field: &str) -> Result<()> {
    if SYSTEM_FIELDS.contains(&field) || E::FIELDS.contains(&field) {
        Ok(())
    } else {
        Err(GatewayError::UnknownField {
            collection: E::COLLECTION.name(),
            field: field.to_owned(),
        })
    }
}

fn not_found<E: Entity>(id: E::Id) -> GatewayError {
    GatewayError::NotFound {
        collection: E::COLLECTION.name(),
        id: id.to_string(),
    }
}

fn to_object<P: Serialize + ?Sized>(payload: &P) -> Result<Map<String, Value>> {
    match serde_json::to_value(payload)? {
        Value::Object(map) => Ok(map),
        other => Err(GatewayError::Backend(format!(
            "expected a JSON object payload, got {other}"
        ))),
    }
}

/// One repository per record kind over a shared backend.
#[derive(Debug, Clone)]
pub struct Gateway {
    pub products: Repository<Product>,
    pub events: Repository<Event>,
    pub bookings: Repository<Booking>,
    pub orders: Repository<Order>,
    store: Arc<dyn DocumentStore>,
}

impl Gateway {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            products: Repository::new(Arc::clone(&store)),
            events: Repository::new(Arc::clone(&store)),
            bookings: Repository::new(Arc::clone(&store)),
            orders: Repository::new(Arc::clone(&store)),
            store,
        }
    }

    /// Gateway over the `portell` schema in `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::new(Arc::new(PgStore::new(pool)))
    }

    /// Gateway over a fresh [`MemoryStore`]. The store is returned too so
    /// tests can inject failures.
    #[must_use]
    pub fn in_memory() -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Self::new(Arc::clone(&store) as Arc<dyn DocumentStore>), store)
    }

    /// Backend liveness probe.
    ///
    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}
