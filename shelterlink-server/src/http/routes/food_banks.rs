//! Food bank endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::{paginate, short};
use crate::db::repos::{FoodBank, FoodBankFilter, FoodBankInput, FoodBankRepo};
use crate::http::envelope::{ApiResponse, ApiResult, CreatedId, Deleted};
use crate::http::extractors::{JsonBody, PathId, QueryParams};
use crate::http::server::AppState;
use crate::models::{Email, GeoFilter, GeoPoint, RequiredText, ValidationError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodBankQuery {
    pub city: Option<String>,
    pub pet_food: Option<bool>,
    pub requires_referral: Option<bool>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodBankRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    pub pet_food_available: Option<bool>,
    pub requires_referral: Option<bool>,
}

impl FoodBankRequest {
    fn validate(self) -> Result<FoodBankInput, ValidationError> {
        let location = GeoPoint::from_optional(self.latitude, self.longitude)?;
        Ok(FoodBankInput {
            name: RequiredText::short("name", self.name.as_deref())?,
            address: RequiredText::short("address", self.address.as_deref())?,
            city: short("city", self.city.as_deref())?,
            postcode: short("postcode", self.postcode.as_deref())?,
            latitude: location.map(|p| p.lat),
            longitude: location.map(|p| p.lng),
            phone: short("phone", self.phone.as_deref())?,
            email: Email::optional("email", self.email.as_deref())?.map(Email::into_string),
            website: short("website", self.website.as_deref())?,
            opening_hours: short("openingHours", self.opening_hours.as_deref())?,
            pet_food_available: self.pet_food_available.unwrap_or(false),
            requires_referral: self.requires_referral.unwrap_or(false),
        })
    }
}

/// GET /api/food-banks
async fn list_food_banks(
    State(state): State<Arc<AppState>>,
    QueryParams(q): QueryParams<FoodBankQuery>,
) -> ApiResult<Vec<FoodBank>> {
    let filter = FoodBankFilter {
        city: short("city", q.city.as_deref())?,
        pet_food: q.pet_food,
        requires_referral: q.requires_referral,
        geo: GeoFilter::from_params(q.lat, q.lng, q.radius)?,
    };
    let rows = FoodBankRepo::new(&state.db)
        .list(&filter, paginate(q.page, q.per_page))
        .await?;
    Ok(ApiResponse::ok(rows))
}

async fn create_food_bank(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<FoodBankRequest>,
) -> ApiResult<CreatedId> {
    let input = req.validate()?;
    let id = FoodBankRepo::new(&state.db).create(&input).await?;
    Ok(ApiResponse::created(CreatedId { id }))
}

async fn get_food_bank(State(state): State<Arc<AppState>>, PathId(id): PathId) -> ApiResult<FoodBank> {
    Ok(ApiResponse::ok(FoodBankRepo::new(&state.db).get(id).await?))
}

async fn update_food_bank(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<FoodBankRequest>,
) -> ApiResult<FoodBank> {
    let input = req.validate()?;
    Ok(ApiResponse::ok(FoodBankRepo::new(&state.db).update(id, &input).await?))
}

async fn delete_food_bank(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
) -> ApiResult<Deleted> {
    FoodBankRepo::new(&state.db).delete(id).await?;
    Ok(ApiResponse::ok(Deleted::YES))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/food-banks", get(list_food_banks).post(create_food_bank))
        .route(
            "/food-banks/{id}",
            get(get_food_bank).put(update_food_bank).delete(delete_food_bank),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::routes::testing;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn missing_address_is_400() {
        let request = testing::json("POST", "/api/food-banks", json!({"name": "Community Pantry"}));
        let (status, body) = testing::send(testing::app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "address is required");
    }

    #[tokio::test]
    async fn radius_out_of_range_is_400() {
        let uri = "/api/food-banks?lat=51.5&lng=-0.1&radius=0";
        let (status, _) = testing::send(testing::app(), testing::get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn request_fields_are_camel_case() {
        let req: FoodBankRequest = serde_json::from_value(json!({
            "name": "Pantry",
            "address": "2 Market St",
            "petFoodAvailable": true,
            "openingHours": "Mon-Fri 9-5",
            "latitude": 51.5,
            "longitude": -0.12,
        }))
        .unwrap();
        let input = req.validate().unwrap();
        assert!(input.pet_food_available);
        assert_eq!(input.opening_hours.as_deref(), Some("Mon-Fri 9-5"));
        assert_eq!(input.longitude, Some(-0.12));
    }
}
