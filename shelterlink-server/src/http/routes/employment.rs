//! Employment opportunity endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::{paginate, short};
use crate::db::repos::{EmploymentRepo, NewOpportunity, Opportunity, OpportunityFilter};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId};
use crate::http::extractors::{JsonBody, PathId, QueryParams};
use crate::http::server::AppState;
use crate::models::{optional_text, RequiredText, ValidationError, MAX_LONG_LEN};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityQuery {
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub remote: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRequest {
    pub title: Option<String>,
    pub employer: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub remote: Option<bool>,
    pub description: Option<String>,
    pub salary_range: Option<String>,
    pub apply_url: Option<String>,
}

impl OpportunityRequest {
    fn validate(self) -> Result<NewOpportunity, ValidationError> {
        Ok(NewOpportunity {
            title: RequiredText::short("title", self.title.as_deref())?,
            employer: RequiredText::short("employer", self.employer.as_deref())?,
            location: short("location", self.location.as_deref())?,
            job_type: short("jobType", self.job_type.as_deref())?,
            remote: self.remote.unwrap_or(false),
            description: optional_text("description", self.description.as_deref(), MAX_LONG_LEN)?,
            salary_range: short("salaryRange", self.salary_range.as_deref())?,
            apply_url: short("applyUrl", self.apply_url.as_deref())?,
        })
    }
}

/// GET /api/employment
async fn list_opportunities(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<OpportunityQuery>,
) -> ApiResult<Vec<Opportunity>> {
    let page = paginate(q.page, q.per_page);
    let filter = OpportunityFilter {
        location: q.location,
        job_type: short("jobType", q.job_type.as_deref())?,
        remote: q.remote,
        search: q.search,
    };
    let rows = EmploymentRepo::new(&state.db).list(&filter, page).await?;
    Ok(ApiResponse::ok(rows))
}

async fn create_opportunity(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<OpportunityRequest>,
) -> ApiResult<CreatedId> {
    let job = req.validate()?;
    let id = EmploymentRepo::new(&state.db).create(&job).await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

async fn get_opportunity(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
) -> ApiResult<Opportunity> {
    Ok(ApiResponse::ok(EmploymentRepo::new(&state.db).get(id).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/employment", get(list_opportunities).post(create_opportunity))
        .route("/employment/{id}", get(get_opportunity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::routes::testing;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn missing_employer_is_400() {
        let request = testing::json("POST", "/api/employment", json!({"title": "Kitchen porter"}));
        let (status, body) = testing::send(testing::app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "employer is required");
    }
}
