//! Dog profiles
//!
//! Update and delete are scoped to the owning user in the statement itself;
//! a write that matches nothing is reported as not found or not owned.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::db::{Db, DbError, Statement};
use crate::models::{Pagination, RequiredText};

const COLUMNS: &str = "id, user_id, name, breed, age_years, is_service_dog, created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dog {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub breed: Option<String>,
    pub age_years: Option<i32>,
    pub is_service_dog: bool,
    pub created_at: DateTime<Utc>,
}

/// Editable dog fields
#[derive(Debug, Clone)]
pub struct DogInput {
    pub name: RequiredText,
    pub breed: Option<String>,
    pub age_years: Option<i32>,
    pub is_service_dog: bool,
}

pub struct DogRepo<'a> {
    db: &'a Db,
}

impl<'a> DogRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn list(&self, user_id: Option<i64>, page: Pagination) -> Result<Vec<Dog>, DbError> {
        let mut stmt = Statement::new(format!("SELECT {COLUMNS} FROM dogs WHERE 1=1"));
        stmt.and_eq("user_id", user_id)
            .push(" ORDER BY name ASC, id ASC")
            .limit_offset(page.limit(), page.offset());
        self.db.query(&stmt).await
    }

    pub async fn get(&self, id: i64) -> Result<Dog, DbError> {
        let stmt = Statement::new(format!("SELECT {COLUMNS} FROM dogs WHERE id = $1")).bind(id);
        self.db
            .query_optional(&stmt)
            .await?
            .ok_or_else(|| DbError::not_found("dog", id))
    }

    /// Owning user of a dog.
    pub async fn owner(&self, id: i64) -> Result<i64, DbError> {
        let stmt = Statement::new("SELECT user_id FROM dogs WHERE id = $1").bind(id);
        self.db
            .query_optional::<(i64,)>(&stmt)
            .await?
            .map(|(user_id,)| user_id)
            .ok_or_else(|| DbError::not_found("dog", id))
    }

    pub async fn create(&self, user_id: i64, dog: &DogInput) -> Result<i64, DbError> {
        let stmt = Statement::new(
            "INSERT INTO dogs (user_id, name, breed, age_years, is_service_dog) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(user_id)
        .bind(dog.name.as_str())
        .bind(dog.breed.as_deref())
        .bind(dog.age_years)
        .bind(dog.is_service_dog);

        self.db.insert(&stmt).await
    }

    pub async fn update(&self, id: i64, user_id: i64, dog: &DogInput) -> Result<Dog, DbError> {
        let stmt = update_statement(id, user_id, dog);
        match self.db.query_optional(&stmt).await? {
            Some(updated) => Ok(updated),
            None => Err(self.unmatched(id).await),
        }
    }

    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), DbError> {
        let stmt = Statement::new("DELETE FROM dogs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id);
        match self.db.execute(&stmt).await?.rows_affected {
            0 => Err(self.unmatched(id).await),
            _ => Ok(()),
        }
    }

    /// Why a scoped write touched no row.
    async fn unmatched(&self, id: i64) -> DbError {
        match self.owner(id).await {
            Ok(owner) => {
                tracing::warn!(dog = id, owner, "dog ownership mismatch");
                DbError::not_owner("dog", id)
            }
            Err(e) => e,
        }
    }
}

fn update_statement(id: i64, user_id: i64, dog: &DogInput) -> Statement {
    Statement::new(format!(
        "UPDATE dogs SET name = $1, breed = $2, age_years = $3, is_service_dog = $4 \
         WHERE id = $5 AND user_id = $6 RETURNING {COLUMNS}"
    ))
    .bind(dog.name.as_str())
    .bind(dog.breed.as_deref())
    .bind(dog.age_years)
    .bind(dog.is_service_dog)
    .bind(id)
    .bind(user_id)
}
