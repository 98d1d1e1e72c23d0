//! API error types with IntoResponse
//!
//! Errors are converted to enveloped JSON responses with appropriate status
//! codes. Database detail is logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::envelope::Envelope;
use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Referenced row does not exist (400)
    InvalidReference,

    /// Caller does not own the resource (401)
    Unauthorized { resource: &'static str },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Unique constraint violated (409)
    Conflict,

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidReference => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::InvalidReference => "referenced record does not exist".to_string(),
            Self::Unauthorized { resource } => format!("not authorized to modify this {resource}"),
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::Conflict => "record already exists".to_string(),
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                "query failed".to_string()
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                "an internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(Envelope::failure(self.message()))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::NotOwner { resource, .. } => Self::Unauthorized { resource },
            DbError::Query(sqlx::Error::Database(ref db)) if db.is_unique_violation() => {
                Self::Conflict
            }
            DbError::Query(sqlx::Error::Database(ref db)) if db.is_foreign_key_violation() => {
                Self::InvalidReference
            }
            _ => Self::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let (status, body) =
            body_json(ApiError::Validation(ValidationError::Required { field: "name" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "name is required");
    }

    #[tokio::test]
    async fn ownership_mismatch_is_401() {
        let (status, body) = body_json(ApiError::Unauthorized { resource: "dog" }).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "not authorized to modify this dog");
    }

    #[tokio::test]
    async fn missing_row_is_404() {
        let (status, _) = body_json(DbError::not_found("shelter", 3).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn foreign_owner_is_401() {
        let (status, body) = body_json(DbError::not_owner("letter", 4).into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "not authorized to modify this letter");
    }

    #[tokio::test]
    async fn driver_failure_is_generic_500() {
        let err: ApiError = DbError::from(sqlx::Error::PoolTimedOut).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "query failed");
        assert!(body.get("data").is_none());
    }
}
