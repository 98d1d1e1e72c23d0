//! User endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::db::repos::{NewUser, User, UserRepo};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId};
use crate::http::extractors::{JsonBody, PathId};
use crate::http::server::AppState;
use crate::models::{Email, RequiredText, ValidationError};

/// Create user request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gdpr_consent: Option<bool>,
}

impl CreateUserRequest {
    fn validate(self) -> Result<NewUser, ValidationError> {
        Ok(NewUser {
            name: RequiredText::short("name", self.name.as_deref())?,
            email: Email::new("email", self.email.as_deref())?,
            gdpr_consent: self.gdpr_consent,
        })
    }
}

/// POST /api/users
async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> ApiResult<CreatedId> {
    let user = req.validate()?;
    let id = UserRepo::new(&state.db).create(user).await?;
    tracing::info!(user = id, "user registered");
    Ok(ApiResponse::created(CreatedId { id }))
}

/// GET /api/users/{id}
async fn get_user(State(state): State<Arc<AppState>>, PathId(id): PathId) -> ApiResult<User> {
    Ok(ApiResponse::ok(UserRepo::new(&state.db).get(id).await?))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::routes::testing;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn email_is_normalized() {
        let req = CreateUserRequest {
            name: Some("Sam".into()),
            email: Some("Sam@Example.ORG".into()),
            gdpr_consent: Some(true),
        };
        assert_eq!(req.validate().unwrap().email.as_str(), "sam@example.org");
    }

    #[tokio::test]
    async fn invalid_email_is_400() {
        let request = testing::json("POST", "/api/users", json!({"name": "Sam", "email": "nope"}));
        let (status, body) = testing::send(testing::app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "email: must be a valid email address");
    }

    #[tokio::test]
    async fn non_numeric_id_is_400() {
        let (status, body) = testing::send(testing::app(), testing::get("/api/users/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
