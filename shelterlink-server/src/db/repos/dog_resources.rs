//! Dog-friendly resources (parks, vets, cafes, ...)

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::db::{Db, DbError, NearbyQuery, Statement};
use crate::models::{GeoFilter, Pagination, RequiredText};

const COLUMNS: &str =
    "id, name, resource_type, address, latitude, longitude, description, created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DogResource {
    pub id: i64,
    pub name: String,
    pub resource_type: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewDogResource {
    pub name: RequiredText,
    pub resource_type: RequiredText,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
}

pub struct DogResourceRepo<'a> {
    db: &'a Db,
}

impl<'a> DogResourceRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        resource_type: Option<&str>,
        geo: Option<GeoFilter>,
        page: Pagination,
    ) -> Result<Vec<DogResource>, DbError> {
        let stmt = NearbyQuery::select(COLUMNS, "dog_friendly_resources", geo)
            .filter_eq("resource_type", resource_type)
            .finish("name ASC, id ASC", page);
        self.db.query(&stmt).await
    }

    pub async fn create(&self, r: &NewDogResource) -> Result<i64, DbError> {
        let stmt = Statement::new(
            "INSERT INTO dog_friendly_resources \
             (name, resource_type, address, latitude, longitude, description) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(r.name.as_str())
        .bind(r.resource_type.as_str())
        .bind(r.address.as_deref())
        .bind(r.latitude)
        .bind(r.longitude)
        .bind(r.description.as_deref());

        self.db.insert(&stmt).await
    }
}
