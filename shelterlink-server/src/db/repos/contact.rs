//! Contact form submissions

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::db::{Db, DbError, Statement};
use crate::models::{Email, Pagination, RequiredText};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: RequiredText,
    pub email: Email,
    pub subject: Option<String>,
    pub message: RequiredText,
}

pub struct ContactRepo<'a> {
    db: &'a Db,
}

impl<'a> ContactRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, msg: &NewContactMessage) -> Result<i64, DbError> {
        let stmt = Statement::new(
            "INSERT INTO contact_messages (name, email, subject, message) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(msg.name.as_str())
        .bind(msg.email.as_str())
        .bind(msg.subject.as_deref())
        .bind(msg.message.as_str());

        self.db.insert(&stmt).await
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<ContactMessage>, DbError> {
        let mut stmt = Statement::new(
            "SELECT id, name, email, subject, message, created_at FROM contact_messages \
             ORDER BY created_at DESC, id DESC",
        );
        stmt.limit_offset(page.limit(), page.offset());
        self.db.query(&stmt).await
    }
}
