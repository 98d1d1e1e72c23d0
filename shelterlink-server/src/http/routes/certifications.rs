//! Service-dog certification endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::Router;
use serde::Deserialize;

use super::{paginate, required_id};
use crate::db::repos::{Certification, CertificationRepo, CertificationStatus, NewCertification};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId};
use crate::http::extractors::{JsonBody, PathId, QueryParams};
use crate::http::server::AppState;
use crate::models::{RequiredText, ValidationError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationQuery {
    pub user_id: Option<i64>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationRequest {
    pub dog_id: Option<i64>,
    pub user_id: Option<i64>,
    pub certification_type: Option<String>,
}

impl CertificationRequest {
    fn validate(self) -> Result<NewCertification, ValidationError> {
        Ok(NewCertification {
            dog_id: required_id("dogId", self.dog_id)?,
            user_id: required_id("userId", self.user_id)?,
            certification_type: RequiredText::short(
                "certificationType",
                self.certification_type.as_deref(),
            )?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

fn parse_status(value: Option<&str>) -> Result<CertificationStatus, ValidationError> {
    CertificationStatus::parse(value.ok_or(ValidationError::Required { field: "status" })?)
}

/// GET /api/service-dog-certifications
async fn list_certifications(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<CertificationQuery>,
) -> ApiResult<Vec<Certification>> {
    let status = q
        .status
        .as_deref()
        .map(CertificationStatus::parse)
        .transpose()?;
    let rows = CertificationRepo::new(&state.db)
        .list(q.user_id, status, paginate(q.page, q.per_page))
        .await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /api/service-dog-certifications - applicant must own the dog
async fn create_certification(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CertificationRequest>,
) -> ApiResult<CreatedId> {
    let cert = req.validate()?;
    let id = CertificationRepo::new(&state.db).create(&cert).await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

/// PUT /api/service-dog-certifications/{id}
async fn update_status(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<StatusRequest>,
) -> ApiResult<Certification> {
    let status = parse_status(req.status.as_deref())?;
    let cert = CertificationRepo::new(&state.db)
        .update_status(id, status)
        .await?;
    Ok(ApiResponse::ok(cert))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/service-dog-certifications",
            get(list_certifications).post(create_certification),
        )
        .route("/service-dog-certifications/{id}", put(update_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::routes::testing;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_status_filter_is_400() {
        let uri = "/api/service-dog-certifications?status=revoked";
        let (status, body) = testing::send(testing::app(), testing::get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "status: must be one of pending, approved, rejected, expired"
        );
    }

    #[tokio::test]
    async fn status_update_requires_status() {
        let request = testing::json("PUT", "/api/service-dog-certifications/1", json!({}));
        let (status, body) = testing::send(testing::app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "status is required");
    }
}
