//! Organization directory endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::{paginate, short};
use crate::db::repos::{NewOrganization, Organization, OrganizationRepo};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId};
use crate::http::extractors::{JsonBody, QueryParams};
use crate::http::server::AppState;
use crate::models::{optional_text, Email, RequiredText, ValidationError, MAX_LONG_LEN};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl OrganizationRequest {
    fn validate(self) -> Result<NewOrganization, ValidationError> {
        Ok(NewOrganization {
            name: RequiredText::short("name", self.name.as_deref())?,
            category: short("category", self.category.as_deref())?,
            description: optional_text("description", self.description.as_deref(), MAX_LONG_LEN)?,
            website: short("website", self.website.as_deref())?,
            phone: short("phone", self.phone.as_deref())?,
            email: Email::optional("email", self.email.as_deref())?.map(Email::into_string),
            address: short("address", self.address.as_deref())?,
        })
    }
}

/// GET /api/organizations
async fn list_organizations(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<OrganizationQuery>,
) -> ApiResult<Vec<Organization>> {
    let rows = OrganizationRepo::new(&state.db)
        .list(
            q.category.as_deref(),
            q.search.as_deref(),
            paginate(q.page, q.per_page),
        )
        .await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /api/organizations
async fn create_organization(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<OrganizationRequest>,
) -> ApiResult<CreatedId> {
    let org = req.validate()?;
    let id = OrganizationRepo::new(&state.db).create(&org).await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/organizations",
        get(list_organizations).post(create_organization),
    )
}
