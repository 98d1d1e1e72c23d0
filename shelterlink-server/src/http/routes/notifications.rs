//! Notification endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::Router;
use serde::Deserialize;

use super::{paginate, required_id};
use crate::db::repos::{NewNotification, Notification, NotificationKind, NotificationRepo};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId, Deleted};
use crate::http::extractors::{JsonBody, PathId, QueryParams};
use crate::http::server::AppState;
use crate::models::{RequiredText, ValidationError, MAX_LONG_LEN};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub user_id: Option<i64>,
    pub unread: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub notification_type: Option<String>,
}

impl NotificationRequest {
    fn validate(self) -> Result<NewNotification, ValidationError> {
        let kind = match self.notification_type.as_deref() {
            Some(t) => NotificationKind::parse(t)?,
            None => NotificationKind::Info,
        };
        Ok(NewNotification {
            user_id: self.user_id,
            title: RequiredText::short("title", self.title.as_deref())?.into_string(),
            message: RequiredText::new("message", self.message.as_deref(), MAX_LONG_LEN)?
                .into_string(),
            kind,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub user_id: Option<i64>,
    pub is_read: Option<bool>,
}

/// GET /api/notifications - the user's notifications plus broadcasts
async fn list_notifications(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<NotificationQuery>,
) -> ApiResult<Vec<Notification>> {
    let rows = NotificationRepo::new(&state.db)
        .list(
            q.user_id,
            q.unread.unwrap_or(false),
            paginate(q.page, q.per_page),
        )
        .await?;
    Ok(ApiResponse::ok(rows))
}

async fn create_notification(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<NotificationRequest>,
) -> ApiResult<CreatedId> {
    let notification = req.validate()?;
    let id = NotificationRepo::new(&state.db).create(&notification).await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

/// PUT /api/notifications/{id} - `isRead` defaults to true; `userId` is
/// the reader and must own a user-addressed notification (401 otherwise)
async fn mark_read(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<MarkReadRequest>,
) -> ApiResult<Notification> {
    let user_id = required_id("userId", req.user_id)?;
    let updated = NotificationRepo::new(&state.db)
        .set_read(id, user_id, req.is_read.unwrap_or(true))
        .await?;
    Ok(ApiResponse::ok(updated))
}

async fn delete_notification(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
) -> ApiResult<Deleted> {
    NotificationRepo::new(&state.db).delete(id).await?;
    Ok(ApiResponse::ok(Deleted::YES))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route(
            "/notifications/{id}",
            put(mark_read).delete(delete_notification),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::routes::testing;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn mark_read_requires_reader() {
        let request = testing::json("PUT", "/api/notifications/4", json!({"isRead": true}));
        let (status, body) = testing::send(testing::app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "userId is required");
    }

    #[test]
    fn type_defaults_to_info() {
        let req: NotificationRequest =
            serde_json::from_value(json!({"title": "Hi", "message": "Welcome"})).unwrap();
        let n = req.validate().unwrap();
        assert_eq!(n.kind, NotificationKind::Info);
        assert_eq!(n.user_id, None);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let req: NotificationRequest = serde_json::from_value(
            json!({"title": "Hi", "message": "Welcome", "notificationType": "urgent"}),
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}
