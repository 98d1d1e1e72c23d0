//! GDPR consent log repository
//!
//! Consent records are append-only: a withdrawal is a new row with
//! `granted = false`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::db::{Db, DbError, Statement};
use crate::models::{Pagination, RequiredText};

/// Consent log entry from database
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConsentLog {
    pub id: i64,
    pub user_id: i64,
    pub consent_type: String,
    pub granted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewConsent {
    pub user_id: i64,
    pub consent_type: RequiredText,
    pub granted: bool,
}

pub fn insert_statement(user_id: i64, consent_type: &str, granted: bool) -> Statement {
    Statement::new(
        "INSERT INTO gdpr_consent_logs (user_id, consent_type, granted) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(user_id)
    .bind(consent_type)
    .bind(granted)
}

pub struct ConsentRepo<'a> {
    db: &'a Db,
}

impl<'a> ConsentRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, consent: &NewConsent) -> Result<i64, DbError> {
        self.db
            .insert(&insert_statement(
                consent.user_id,
                consent.consent_type.as_str(),
                consent.granted,
            ))
            .await
    }

    pub async fn list_for_user(
        &self,
        user_id: i64,
        page: Pagination,
    ) -> Result<Vec<ConsentLog>, DbError> {
        let mut stmt = Statement::new(
            "SELECT id, user_id, consent_type, granted, created_at \
             FROM gdpr_consent_logs WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id);
        stmt.limit_offset(page.limit(), page.offset());

        self.db.query(&stmt).await
    }
}
