//! Contact form endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;

use super::short;
use crate::db::repos::{ContactMessage, ContactRepo, NewContactMessage};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId};
use crate::http::extractors::{JsonBody, QueryParams};
use crate::http::server::AppState;
use crate::models::{Email, PaginationParams, RequiredText, ValidationError, MAX_LONG_LEN};

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactRequest {
    fn validate(self) -> Result<NewContactMessage, ValidationError> {
        Ok(NewContactMessage {
            name: RequiredText::short("name", self.name.as_deref())?,
            email: Email::new("email", self.email.as_deref())?,
            subject: short("subject", self.subject.as_deref())?,
            message: RequiredText::new("message", self.message.as_deref(), MAX_LONG_LEN)?,
        })
    }
}

/// POST /api/contact
async fn submit(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ContactRequest>,
) -> ApiResult<CreatedId> {
    let msg = req.validate()?;
    let id = ContactRepo::new(&state.db).create(&msg).await?;
    tracing::info!(contact = id, "contact message received");
    Ok(ApiResponse::created(CreatedId { id }))
}

/// GET /api/contact
async fn list_messages(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> ApiResult<Vec<ContactMessage>> {
    let rows = ContactRepo::new(&state.db)
        .list(params.into())
        .await?;
    Ok(ApiResponse::ok(rows))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/contact", post(submit).get(list_messages))
}
