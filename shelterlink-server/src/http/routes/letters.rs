//! Letter generation endpoints
//!
//! `OPTIONS /api/letters` and `GET /api/letters/templates` both list the
//! available templates.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{delete, get};
use axum::Router;
use serde::Deserialize;

use super::{paginate, required_id};
use crate::db::repos::{Letter, LetterRepo, LetterTemplate, NewLetter};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId, Deleted};
use crate::http::extractors::{JsonBody, PathId, QueryParams};
use crate::http::server::AppState;
use crate::models::{RequiredText, ValidationError, MAX_LONG_LEN};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterQuery {
    pub user_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterRequest {
    pub user_id: Option<i64>,
    pub template_id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl LetterRequest {
    fn validate(self) -> Result<NewLetter, ValidationError> {
        Ok(NewLetter {
            user_id: self.user_id,
            template_id: required_id("templateId", self.template_id)?,
            title: RequiredText::short("title", self.title.as_deref())?,
            content: RequiredText::new("content", self.content.as_deref(), MAX_LONG_LEN)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLetterRequest {
    pub user_id: Option<i64>,
}

/// GET /api/letters/templates, OPTIONS /api/letters
async fn list_templates(State(state): State<Arc<AppState>>) -> ApiResult<Vec<LetterTemplate>> {
    Ok(ApiResponse::ok(LetterRepo::new(&state.db).templates().await?))
}

/// GET /api/letters
async fn list_letters(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<LetterQuery>,
) -> ApiResult<Vec<Letter>> {
    let rows = LetterRepo::new(&state.db)
        .list(q.user_id, paginate(q.page, q.per_page))
        .await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /api/letters
async fn create_letter(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LetterRequest>,
) -> ApiResult<CreatedId> {
    let letter = req.validate()?;
    let id = LetterRepo::new(&state.db).create(&letter).await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

/// DELETE /api/letters/{id} - only the owner may delete
async fn delete_letter(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<DeleteLetterRequest>,
) -> ApiResult<Deleted> {
    let user_id = required_id("userId", req.user_id)?;
    LetterRepo::new(&state.db).delete(id, user_id).await?;
    Ok(ApiResponse::ok(Deleted::YES))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/letters",
            get(list_letters).post(create_letter).options(list_templates),
        )
        .route("/letters/templates", get(list_templates))
        .route("/letters/{id}", delete(delete_letter))
}
