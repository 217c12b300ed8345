//! Gateway error type.

use thiserror::Error;

/// Errors that can occur during gateway operations.
///
/// Every variant carries the backing store's own message so callers can
/// show or log it as-is.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Non-database backend failure (in-memory store, injected faults).
    #[error("{0}")]
    Backend(String),

    /// Requested record does not exist.
    #[error("{collection} {id} not found")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    /// Filter or sort named a field the record kind does not have.
    #[error("unknown field `{field}` for {collection}")]
    UnknownField {
        collection: &'static str,
        field: String,
    },

    /// Payload could not be turned into a JSON object.
    #[error("invalid payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored document no longer matches its record type.
    #[error("data corruption in {collection} {id}: {message}")]
    DataCorruption {
        collection: &'static str,
        id: String,
        message: String,
    },

    /// A bounded increment would exceed its ceiling.
    #[error("not enough capacity: requested {requested}, available {available}")]
    CapacityExceeded { requested: i64, available: i64 },
}

impl GatewayError {
    /// `true` for [`GatewayError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for gateway calls.
pub type Result<T> = std::result::Result<T, GatewayError>;
