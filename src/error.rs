use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Closed error taxonomy for the API. Each variant maps to exactly one HTTP
/// status; handlers and services return this type everywhere.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("No token, authorization denied")]
    MissingCredential,

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Admin access required")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Product with this slug already exists")]
    DuplicateSlug(String),

    #[error("File too large. Maximum size is {limit} bytes.")]
    PayloadTooLarge { limit: usize },

    #[error("No files provided")]
    NoFilesProvided,

    #[error("{0} is not configured on the server")]
    Misconfigured(&'static str),

    #[error("database error")]
    Database(#[source] sqlx::Error),

    #[error("storage error")]
    Storage(#[source] anyhow::Error),

    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Variant to status mapping; pure.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::MissingCredential => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredential => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateSlug(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NoFilesProvided => StatusCode::BAD_REQUEST,
            ApiError::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client. Server-side failures collapse to a
    /// generic message; detail stays in the logs.
    fn client_message(&self) -> String {
        match self {
            ApiError::Database(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                "Server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            error!(error = ?self, "request failed");
        }
        let field = match &self {
            ApiError::Validation { field, .. } => Some(*field),
            _ => None,
        };
        let body = ErrorBody {
            message: self.client_message(),
            field,
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource"),
            other => ApiError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::validation("name", "Name is required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::MissingCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("Product").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::DuplicateSlug("rock-phosphate".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::PayloadTooLarge { limit: 1024 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(ApiError::NoFilesProvided.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Misconfigured("JWT secret").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_slug_message_mentions_existing() {
        let err = ApiError::DuplicateSlug("rock-phosphate".into());
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn server_errors_hide_detail() {
        let err = ApiError::Database(sqlx::Error::PoolClosed);
        assert_eq!(err.client_message(), "Server error");
    }
}
