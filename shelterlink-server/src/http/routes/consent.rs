//! GDPR consent log endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::{paginate, required_id};
use crate::db::repos::{ConsentLog, ConsentRepo, NewConsent};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId};
use crate::http::extractors::{JsonBody, QueryParams};
use crate::http::server::AppState;
use crate::models::{RequiredText, ValidationError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentQuery {
    pub user_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRequest {
    pub user_id: Option<i64>,
    pub consent_type: Option<String>,
    pub granted: Option<bool>,
}

impl ConsentRequest {
    fn validate(self) -> Result<NewConsent, ValidationError> {
        Ok(NewConsent {
            user_id: required_id("userId", self.user_id)?,
            consent_type: RequiredText::short("consentType", self.consent_type.as_deref())?,
            granted: self
                .granted
                .ok_or(ValidationError::Required { field: "granted" })?,
        })
    }
}

/// GET /api/gdpr-consent?userId=
async fn list_consent(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<ConsentQuery>,
) -> ApiResult<Vec<ConsentLog>> {
    let user_id = required_id("userId", q.user_id)?;
    let rows = ConsentRepo::new(&state.db)
        .list_for_user(user_id, paginate(q.page, q.per_page))
        .await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /api/gdpr-consent - appends; withdrawal is `granted: false`
async fn record_consent(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ConsentRequest>,
) -> ApiResult<CreatedId> {
    let consent = req.validate()?;
    let id = ConsentRepo::new(&state.db).create(&consent).await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/gdpr-consent", get(list_consent).post(record_consent))
}
