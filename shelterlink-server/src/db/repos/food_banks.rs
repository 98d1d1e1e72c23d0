//! Food bank repository

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::db::{Db, DbError, NearbyQuery, Statement};
use crate::models::{GeoFilter, Pagination, RequiredText};

const COLUMNS: &str = "id, name, address, city, postcode, latitude, longitude, phone, email, \
                       website, opening_hours, pet_food_available, requires_referral, created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodBank {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    pub pet_food_available: bool,
    pub requires_referral: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct FoodBankInput {
    pub name: RequiredText,
    pub address: RequiredText,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    pub pet_food_available: bool,
    pub requires_referral: bool,
}

impl FoodBankInput {
    fn bind_fields(&self, stmt: Statement) -> Statement {
        stmt.bind(self.name.as_str())
            .bind(self.address.as_str())
            .bind(self.city.as_deref())
            .bind(self.postcode.as_deref())
            .bind(self.latitude)
            .bind(self.longitude)
            .bind(self.phone.as_deref())
            .bind(self.email.as_deref())
            .bind(self.website.as_deref())
            .bind(self.opening_hours.as_deref())
            .bind(self.pet_food_available)
            .bind(self.requires_referral)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FoodBankFilter {
    pub city: Option<String>,
    pub pet_food: Option<bool>,
    pub requires_referral: Option<bool>,
    pub geo: Option<GeoFilter>,
}

pub struct FoodBankRepo<'a> {
    db: &'a Db,
}

impl<'a> FoodBankRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        filter: &FoodBankFilter,
        page: Pagination,
    ) -> Result<Vec<FoodBank>, DbError> {
        self.db.query(&list_statement(filter, page)).await
    }

    pub async fn get(&self, id: i64) -> Result<FoodBank, DbError> {
        let stmt = Statement::new(format!(
            "SELECT {COLUMNS}, NULL::DOUBLE PRECISION AS distance FROM food_banks WHERE id = $1"
        ))
        .bind(id);

        self.db
            .query_optional(&stmt)
            .await?
            .ok_or_else(|| DbError::not_found("food bank", id))
    }

    pub async fn create(&self, input: &FoodBankInput) -> Result<i64, DbError> {
        let stmt = input.bind_fields(Statement::new(
            "INSERT INTO food_banks (name, address, city, postcode, latitude, longitude, phone, \
             email, website, opening_hours, pet_food_available, requires_referral) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING id",
        ));
        self.db.insert(&stmt).await
    }

    /// Replace every mutable field.
    pub async fn update(&self, id: i64, input: &FoodBankInput) -> Result<FoodBank, DbError> {
        let stmt = input
            .bind_fields(Statement::new(format!(
                "UPDATE food_banks SET name = $1, address = $2, city = $3, postcode = $4, \
                 latitude = $5, longitude = $6, phone = $7, email = $8, website = $9, \
                 opening_hours = $10, pet_food_available = $11, requires_referral = $12 \
                 WHERE id = $13 RETURNING {COLUMNS}, NULL::DOUBLE PRECISION AS distance"
            )))
            .bind(id);

        self.db
            .query_optional(&stmt)
            .await?
            .ok_or_else(|| DbError::not_found("food bank", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let stmt = Statement::new("DELETE FROM food_banks WHERE id = $1").bind(id);
        match self.db.execute(&stmt).await?.rows_affected {
            0 => Err(DbError::not_found("food bank", id)),
            _ => Ok(()),
        }
    }
}

fn list_statement(filter: &FoodBankFilter, page: Pagination) -> Statement {
    NearbyQuery::select(COLUMNS, "food_banks", filter.geo)
        .filter_eq("LOWER(city)", filter.city.as_deref().map(str::to_lowercase))
        .filter_eq("pet_food_available", filter.pet_food)
        .filter_eq("requires_referral", filter.requires_referral)
        .finish("name ASC, id ASC", page)
}
