//! User repository
//!
//! Registration writes the user and, when supplied, the initial GDPR
//! consent record in one transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::consent;
use crate::db::exec::{execute, insert};
use crate::db::{Db, DbError, Statement};
use crate::models::{Email, RequiredText};

/// Consent type recorded at registration
pub const REGISTRATION_CONSENT: &str = "registration";

/// User record from database
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: RequiredText,
    pub email: Email,
    pub gdpr_consent: Option<bool>,
}

pub struct UserRepo<'a> {
    db: &'a Db,
}

impl<'a> UserRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Create a user (and consent log) atomically.
    pub async fn create(&self, user: NewUser) -> Result<i64, DbError> {
        let insert_user = Statement::new(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id",
        )
        .bind(user.name.into_string())
        .bind(user.email.as_str());
        let consent = user.gdpr_consent;

        self.db
            .transaction(|conn| {
                Box::pin(async move {
                    let id = insert(&mut *conn, &insert_user).await?;
                    if let Some(granted) = consent {
                        execute(
                            &mut *conn,
                            &consent::insert_statement(id, REGISTRATION_CONSENT, granted),
                        )
                        .await?;
                    }
                    Ok(id)
                })
            })
            .await
    }

    pub async fn get(&self, id: i64) -> Result<User, DbError> {
        let stmt = Statement::new("SELECT id, name, email, created_at FROM users WHERE id = $1")
            .bind(id);
        self.db
            .query_optional(&stmt)
            .await?
            .ok_or_else(|| DbError::not_found("user", id))
    }
}
