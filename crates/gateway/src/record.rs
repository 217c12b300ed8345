//! Persisted records: a domain value plus its server-assigned columns.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::Entity;
use crate::error::{GatewayError, Result};
use crate::store::StoredDocument;

/// A stored entity together with its id and timestamps.
///
/// Serializes flat, the way pages and the admin JSON endpoints expect:
/// `{"id": ..., "created_at": ..., "updated_at": ..., "title": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct Record<E: Entity> {
    pub id: E::Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: E,
}

impl<E: Entity> Record<E> {
    pub(crate) fn decode(doc: StoredDocument) -> Result<Self> {
        let data = serde_json::from_value(serde_json::Value::Object(doc.data)).map_err(|e| {
            GatewayError::DataCorruption {
                collection: E::COLLECTION.name(),
                id: doc.id.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            id: E::Id::from(doc.id),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            data,
        })
    }

    /// Drop the row columns.
    #[must_use]
    pub fn into_inner(self) -> E {
        self.data
    }
}

impl<E: Entity> AsRef<E> for Record<E> {
    fn as_ref(&self) -> &E {
        &self.data
    }
}

impl<E: Entity> std::ops::Deref for Record<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.data
    }
}
