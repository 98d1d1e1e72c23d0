//! Emergency shelter repository
//!
//! - list: optional city/pets/families filters plus radius search
//! - create: shelter + broadcast notification in one transaction
//! - update: full replacement of the mutable fields (idempotent)

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::notifications::{self, NewNotification, NotificationKind};
use crate::db::exec::{execute, insert};
use crate::db::{Db, DbError, NearbyQuery, Statement};
use crate::models::{GeoFilter, Pagination, RequiredText};

const COLUMNS: &str = "id, name, address, city, postcode, latitude, longitude, capacity, \
                       available_beds, accepts_pets, accepts_families, open_24h, phone, \
                       created_at, updated_at";

/// Shelter record; `distance` is set only for radius searches.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: Option<i32>,
    pub available_beds: Option<i32>,
    pub accepts_pets: bool,
    pub accepts_families: bool,
    pub open_24h: bool,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Validated shelter fields for create and replace
#[derive(Debug, Clone)]
pub struct ShelterInput {
    pub name: RequiredText,
    pub address: RequiredText,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: Option<i32>,
    pub available_beds: Option<i32>,
    pub accepts_pets: bool,
    pub accepts_families: bool,
    pub open_24h: bool,
    pub phone: Option<String>,
}

impl ShelterInput {
    fn bind_fields(&self, stmt: Statement) -> Statement {
        stmt.bind(self.name.as_str())
            .bind(self.address.as_str())
            .bind(self.city.as_deref())
            .bind(self.postcode.as_deref())
            .bind(self.latitude)
            .bind(self.longitude)
            .bind(self.capacity)
            .bind(self.available_beds)
            .bind(self.accepts_pets)
            .bind(self.accepts_families)
            .bind(self.open_24h)
            .bind(self.phone.as_deref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShelterFilter {
    pub city: Option<String>,
    pub accepts_pets: Option<bool>,
    pub accepts_families: Option<bool>,
    pub geo: Option<GeoFilter>,
}

pub struct ShelterRepo<'a> {
    db: &'a Db,
}

impl<'a> ShelterRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &ShelterFilter, page: Pagination) -> Result<Vec<Shelter>, DbError> {
        let stmt = list_statement(filter, page);
        self.db.query(&stmt).await
    }

    pub async fn get(&self, id: i64) -> Result<Shelter, DbError> {
        let stmt = Statement::new(format!(
            "SELECT {COLUMNS}, NULL::DOUBLE PRECISION AS distance \
             FROM emergency_shelters WHERE id = $1"
        ))
        .bind(id);

        self.db
            .query_optional(&stmt)
            .await?
            .ok_or_else(|| DbError::not_found("shelter", id))
    }

    /// Insert the shelter and announce it, atomically.
    pub async fn create(&self, input: ShelterInput) -> Result<i64, DbError> {
        let insert_shelter = input.bind_fields(Statement::new(
            "INSERT INTO emergency_shelters (name, address, city, postcode, latitude, longitude, \
             capacity, available_beds, accepts_pets, accepts_families, open_24h, phone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING id",
        ));
        let announce = notifications::insert_statement(&announcement(&input));

        self.db
            .transaction(|conn| {
                Box::pin(async move {
                    let id = insert(&mut *conn, &insert_shelter).await?;
                    execute(&mut *conn, &announce).await?;
                    Ok(id)
                })
            })
            .await
    }

    pub async fn update(&self, id: i64, input: &ShelterInput) -> Result<Shelter, DbError> {
        let stmt = input
            .bind_fields(Statement::new(format!(
                "UPDATE emergency_shelters SET name = $1, address = $2, city = $3, postcode = $4, \
                 latitude = $5, longitude = $6, capacity = $7, available_beds = $8, \
                 accepts_pets = $9, accepts_families = $10, open_24h = $11, phone = $12, \
                 updated_at = NOW() \
                 WHERE id = $13 RETURNING {COLUMNS}, NULL::DOUBLE PRECISION AS distance"
            )))
            .bind(id);

        self.db
            .query_optional(&stmt)
            .await?
            .ok_or_else(|| DbError::not_found("shelter", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let stmt = Statement::new("DELETE FROM emergency_shelters WHERE id = $1").bind(id);
        match self.db.execute(&stmt).await?.rows_affected {
            0 => Err(DbError::not_found("shelter", id)),
            _ => Ok(()),
        }
    }
}

fn list_statement(filter: &ShelterFilter, page: Pagination) -> Statement {
    NearbyQuery::select(COLUMNS, "emergency_shelters", filter.geo)
        .filter_eq("LOWER(city)", filter.city.as_deref().map(str::to_lowercase))
        .filter_eq("accepts_pets", filter.accepts_pets)
        .filter_eq("accepts_families", filter.accepts_families)
        .finish("name ASC, id ASC", page)
}

/// Broadcast announcing a new shelter.
fn announcement(input: &ShelterInput) -> NewNotification {
    let place = match &input.city {
        Some(city) => format!("{} ({})", input.address.as_str(), city),
        None => input.address.as_str().to_owned(),
    };
    NewNotification {
        user_id: None,
        title: "New emergency shelter".to_string(),
        message: format!("New emergency shelter available at {place}"),
        kind: NotificationKind::Shelter,
    }
}
