//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portell_gateway::GatewayError;
use portell_gateway::storage::StorageError;
use thiserror::Error;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data gateway operation failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Image storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A feature that needs configuration which is missing.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code and the message shown to the admin. Server-side details
    /// stay in the logs.
    fn public(&self) -> (StatusCode, String) {
        match self {
            Self::Gateway(err) if err.is_not_found() => {
                (StatusCode::NOT_FOUND, "Not found".to_owned())
            }
            Self::Gateway(_) | Self::Template(_) | Self::Session(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned(),
            ),
            Self::Storage(_) => (StatusCode::BAD_GATEWAY, "Image storage failed".to_owned()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.public();

        // A missing storage config is an operator choice, not a fault.
        if status.is_server_error() && !matches!(self, Self::Unavailable(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Admin request failed");
        }

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the logged-in admin.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AppError::NotFound("product abc".to_owned());
        assert_eq!(err.public().1, "Not found: product abc");
        assert_eq!(status(err), StatusCode::NOT_FOUND);
        assert_eq!(
            status(AppError::BadRequest("bad slug".to_owned())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_errors_are_masked() {
        let err = AppError::Internal("pool timed out".to_owned());
        assert_eq!(
            err.public(),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned()
            )
        );
        assert_eq!(
            status(AppError::Unavailable("storage".to_owned())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
