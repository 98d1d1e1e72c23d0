//! Dog profile endpoints
//!
//! PUT and DELETE carry the caller's `userId` in the body and are refused
//! with 401 unless it owns the dog.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::Router;
use serde::Deserialize;

use super::{paginate, required_id, short};
use crate::db::repos::{Dog, DogInput, DogRepo};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId, Deleted};
use crate::http::extractors::{JsonBody, PathId, QueryParams};
use crate::http::server::AppState;
use crate::models::{RequiredText, ValidationError};

/// Oldest plausible age for a dog, in years.
const MAX_AGE_YEARS: i32 = 40;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogQuery {
    pub user_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogRequest {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub age_years: Option<i32>,
    pub is_service_dog: Option<bool>,
}

impl DogRequest {
    fn validate(self) -> Result<(i64, DogInput), ValidationError> {
        let user_id = required_id("userId", self.user_id)?;
        if self.age_years.is_some_and(|a| !(0..=MAX_AGE_YEARS).contains(&a)) {
            return Err(ValidationError::OutOfRange {
                field: "ageYears",
                min: 0.0,
                max: f64::from(MAX_AGE_YEARS),
            });
        }
        let dog = DogInput {
            name: RequiredText::short("name", self.name.as_deref())?,
            breed: short("breed", self.breed.as_deref())?,
            age_years: self.age_years,
            is_service_dog: self.is_service_dog.unwrap_or(false),
        };
        Ok((user_id, dog))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRequest {
    pub user_id: Option<i64>,
}

/// GET /api/dogs
async fn list_dogs(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<DogQuery>,
) -> ApiResult<Vec<Dog>> {
    let rows = DogRepo::new(&state.db)
        .list(q.user_id, paginate(q.page, q.per_page))
        .await?;
    Ok(ApiResponse::ok(rows))
}

/// POST /api/dogs
async fn create_dog(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<DogRequest>,
) -> ApiResult<CreatedId> {
    let (user_id, dog) = req.validate()?;
    let id = DogRepo::new(&state.db).create(user_id, &dog).await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

/// PUT /api/dogs/{id}
async fn update_dog(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<DogRequest>,
) -> ApiResult<Dog> {
    let (user_id, dog) = req.validate()?;
    let updated = DogRepo::new(&state.db).update(id, user_id, &dog).await?;
    Ok(ApiResponse::ok(updated))
}

/// DELETE /api/dogs/{id}
async fn delete_dog(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<OwnerRequest>,
) -> ApiResult<Deleted> {
    let user_id = required_id("userId", req.user_id)?;
    DogRepo::new(&state.db).delete(id, user_id).await?;
    Ok(ApiResponse::ok(Deleted::YES))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dogs", get(list_dogs).post(create_dog))
        .route("/dogs/{id}", put(update_dog).delete(delete_dog))
}
