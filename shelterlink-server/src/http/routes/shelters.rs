//! Emergency shelter endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::{paginate, short};
use crate::db::repos::{Shelter, ShelterFilter, ShelterInput, ShelterRepo};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId, Deleted};
use crate::http::extractors::{JsonBody, PathId, QueryParams};
use crate::http::server::AppState;
use crate::models::{GeoFilter, GeoPoint, RequiredText, ValidationError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterQuery {
    pub city: Option<String>,
    pub accepts_pets: Option<bool>,
    pub accepts_families: Option<bool>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Create/replace shelter request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: Option<i32>,
    pub available_beds: Option<i32>,
    pub accepts_pets: Option<bool>,
    pub accepts_families: Option<bool>,
    pub open_24h: Option<bool>,
    pub phone: Option<String>,
}

impl ShelterRequest {
    fn validate(self) -> Result<ShelterInput, ValidationError> {
        let location = GeoPoint::from_optional(self.latitude, self.longitude)?;
        for (field, value) in [("capacity", self.capacity), ("availableBeds", self.available_beds)] {
            if value.is_some_and(|v| v < 0) {
                return Err(ValidationError::OutOfRange {
                    field,
                    min: 0.0,
                    max: f64::from(i32::MAX),
                });
            }
        }

        Ok(ShelterInput {
            name: RequiredText::short("name", self.name.as_deref())?,
            address: RequiredText::short("address", self.address.as_deref())?,
            city: short("city", self.city.as_deref())?,
            postcode: short("postcode", self.postcode.as_deref())?,
            latitude: location.map(|p| p.lat),
            longitude: location.map(|p| p.lng),
            capacity: self.capacity,
            available_beds: self.available_beds,
            accepts_pets: self.accepts_pets.unwrap_or(false),
            accepts_families: self.accepts_families.unwrap_or(false),
            open_24h: self.open_24h.unwrap_or(false),
            phone: short("phone", self.phone.as_deref())?,
        })
    }
}

/// GET /api/shelters
async fn list_shelters(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<ShelterQuery>,
) -> ApiResult<Vec<Shelter>> {
    let filter = ShelterFilter {
        city: short("city", q.city.as_deref())?,
        accepts_pets: q.accepts_pets,
        accepts_families: q.accepts_families,
        geo: GeoFilter::from_params(q.lat, q.lng, q.radius)?,
    };
    let rows = ShelterRepo::new(&state.db)
        .list(&filter, paginate(q.page, q.per_page))
        .await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /api/shelters - also broadcasts a "new shelter" notification
async fn create_shelter(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ShelterRequest>,
) -> ApiResult<CreatedId> {
    let input = req.validate()?;
    let id = ShelterRepo::new(&state.db).create(input).await?;
    tracing::info!(shelter = id, "shelter created");
    Ok(ApiResponse::created(CreatedId { id }))
}

async fn get_shelter(State(state): State<Arc<AppState>>, PathId(id): PathId) -> ApiResult<Shelter> {
    Ok(ApiResponse::ok(ShelterRepo::new(&state.db).get(id).await?))
}

/// PUT /api/shelters/{id} - full replacement
async fn update_shelter(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<ShelterRequest>,
) -> ApiResult<Shelter> {
    let input = req.validate()?;
    Ok(ApiResponse::ok(ShelterRepo::new(&state.db).update(id, &input).await?))
}

async fn delete_shelter(State(state): State<Arc<AppState>>, PathId(id): PathId) -> ApiResult<Deleted> {
    ShelterRepo::new(&state.db).delete(id).await?;
    Ok(ApiResponse::ok(Deleted::YES))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shelters", get(list_shelters).post(create_shelter))
        .route(
            "/shelters/{id}",
            get(get_shelter).put(update_shelter).delete(delete_shelter),
        )
}
