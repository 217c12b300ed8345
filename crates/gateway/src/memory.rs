//! In-process document store for tests and local development.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{GatewayError, Result};
use crate::query::{Criteria, SortSpec};
use crate::store::{BoundedIncrement, Collection, DocumentStore, StoredDocument, strip_system_fields};

/// A [`DocumentStore`] backed by a map in memory.
///
/// Writes to a collection can be made to fail with
/// [`MemoryStore::fail_writes`] to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<StoredDocument>>>,
    failing: RwLock<HashMap<Collection, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `collection` fail with `message`.
    pub async fn fail_writes(&self, collection: Collection, message: &str) {
        self.failing
            .write()
            .await
            .insert(collection, message.to_owned());
    }

    /// Undo [`MemoryStore::fail_writes`].
    pub async fn heal(&self, collection: Collection) {
        self.failing.write().await.remove(&collection);
    }

    async fn check_writable(&self, collection: Collection) -> Result<()> {
        match self.failing.read().await.get(&collection) {
            Some(message) => Err(GatewayError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        criteria: &Criteria,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> Result<Vec<StoredDocument>> {
        let guard = self.collections.read().await;
        let mut docs: Vec<StoredDocument> = guard
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| {
                        criteria
                            .iter()
                            .all(|(field, condition)| condition.matches(&field_value(doc, field)))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(guard);

        docs.sort_by(|a, b| compare_docs(a, b, sort));
        if let Some(limit) = limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDocument>> {
        Ok(self
            .collections
            .read()
            .await
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn insert(
        &self,
        collection: Collection,
        mut data: Map<String, Value>,
    ) -> Result<StoredDocument> {
        self.check_writable(collection).await?;
        strip_system_fields(&mut data);

        let now = Utc::now();
        let doc = StoredDocument {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            data,
        };
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn merge(
        &self,
        collection: Collection,
        id: Uuid,
        mut patch: Map<String, Value>,
    ) -> Result<Option<StoredDocument>> {
        self.check_writable(collection).await?;
        strip_system_fields(&mut patch);

        let mut guard = self.collections.write().await;
        let Some(doc) = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
        else {
            return Ok(None);
        };
        doc.data.extend(patch);
        doc.updated_at = Utc::now();
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool> {
        self.check_writable(collection).await?;
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        Ok(docs.len() != before)
    }

    async fn increment_bounded(
        &self,
        collection: Collection,
        id: Uuid,
        field: &str,
        by: i64,
        ceiling_field: &str,
    ) -> Result<BoundedIncrement> {
        self.check_writable(collection).await?;

        // Single write guard: read, check and write happen under one lock.
        let mut guard = self.collections.write().await;
        let Some(doc) = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
        else {
            return Ok(BoundedIncrement::Missing);
        };

        let current = doc.data.get(field).and_then(Value::as_i64).unwrap_or(0);
        let ceiling = doc
            .data
            .get(ceiling_field)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        if current + by > ceiling {
            return Ok(BoundedIncrement::Rejected { current, ceiling });
        }

        doc.data.insert(field.to_owned(), Value::from(current + by));
        doc.updated_at = Utc::now();
        Ok(BoundedIncrement::Applied(doc.clone()))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Value of `field` as the filter and sort code sees it. Row columns are
/// exposed the way they serialize.
fn field_value(doc: &StoredDocument, field: &str) -> Value {
    match field {
        "id" => Value::String(doc.id.to_string()),
        "created_at" => Value::String(doc.created_at.to_rfc3339()),
        "updated_at" => Value::String(doc.updated_at.to_rfc3339()),
        other => doc.data.get(other).cloned().unwrap_or(Value::Null),
    }
}

fn compare_docs(a: &StoredDocument, b: &StoredDocument, sort: &SortSpec) -> Ordering {
    let primary = match sort.field.as_str() {
        "created_at" => a.created_at.cmp(&b.created_at),
        "updated_at" => a.updated_at.cmp(&b.updated_at),
        "id" => a.id.cmp(&b.id),
        field => {
            let (va, vb) = (field_value(a, field), field_value(b, field));
            // numeric values sort before everything else in both directions
            match (numeric(&va), numeric(&vb)) {
                (Some(x), Some(y)) => directed(x.cmp(&y), sort.descending),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => directed(compare_json(&va, &vb), sort.descending),
            }
        }
    };
    let primary = if sort.is_system_field() {
        directed(primary, sort.descending)
    } else {
        primary
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

const fn directed(ordering: Ordering, descending: bool) -> Ordering {
    if descending {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Numbers and numeric strings (how decimals are stored) as a sort key.
fn numeric(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) if looks_numeric(s) => s.parse().ok(),
        _ => None,
    }
}

fn looks_numeric(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && frac.is_none_or(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
}

/// Ordering across JSON types: null < string < number < bool < array < object.
fn compare_json(a: &Value, b: &Value) -> Ordering {
    const fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::String(_) => 1,
            Value::Number(_) => 2,
            Value::Bool(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
