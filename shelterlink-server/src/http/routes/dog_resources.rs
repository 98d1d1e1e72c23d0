//! Dog-friendly resource endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::{paginate, short};
use crate::db::repos::{DogResource, DogResourceRepo, NewDogResource};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId};
use crate::http::extractors::{JsonBody, QueryParams};
use crate::http::server::AppState;
use crate::models::{optional_text, GeoFilter, GeoPoint, RequiredText, ValidationError, MAX_LONG_LEN};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogResourceQuery {
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogResourceRequest {
    pub name: Option<String>,
    pub resource_type: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
}

impl DogResourceRequest {
    fn validate(self) -> Result<NewDogResource, ValidationError> {
        let location = GeoPoint::from_optional(self.latitude, self.longitude)?;
        Ok(NewDogResource {
            name: RequiredText::short("name", self.name.as_deref())?,
            resource_type: RequiredText::short("resourceType", self.resource_type.as_deref())?,
            address: short("address", self.address.as_deref())?,
            latitude: location.map(|p| p.lat),
            longitude: location.map(|p| p.lng),
            description: optional_text("description", self.description.as_deref(), MAX_LONG_LEN)?,
        })
    }
}

/// GET /api/dog-friendly-resources
async fn list_resources(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<DogResourceQuery>,
) -> ApiResult<Vec<DogResource>> {
    let resource_type = short("type", q.resource_type.as_deref())?;
    let geo = GeoFilter::from_params(q.lat, q.lng, q.radius)?;
    let rows = DogResourceRepo::new(&state.db)
        .list(resource_type.as_deref(), geo, paginate(q.page, q.per_page))
        .await?;
    Ok(ApiResponse::ok(rows))
}

async fn create_resource(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<DogResourceRequest>,
) -> ApiResult<CreatedId> {
    let resource = req.validate()?;
    let id = DogResourceRepo::new(&state.db).create(&resource).await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/dog-friendly-resources",
        get(list_resources).post(create_resource),
    )
}
