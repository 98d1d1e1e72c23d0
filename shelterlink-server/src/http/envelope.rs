//! Response envelope
//!
//! Success: `{"success": true, "data": ...}`.
//! Failure: `{"success": false, "error": "..."}` (see [`ApiError`](super::ApiError)).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::error::ApiError;

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[derive(Debug, Serialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope<()> {
    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Successful response with status code
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    /// 201 Created
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            success: true,
            data: Some(self.data),
            error: None,
        };
        (self.status, Json(body)).into_response()
    }
}

/// `{"id": n}` body returned by create endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatedId {
    pub id: i64,
}

/// `{"deleted": true}` body returned by delete endpoints
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

impl Deleted {
    pub const YES: Self = Self { deleted: true };
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn created_wraps_data() {
        let response = ApiResponse::created(CreatedId { id: 5 }).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": {"id": 5}}));
    }

    #[test]
    fn failure_omits_data() {
        let json = serde_json::to_value(Envelope::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));
    }
}
