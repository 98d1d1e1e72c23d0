//! Letter templates and generated letters

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::db::{Db, DbError, Statement};
use crate::models::{Pagination, RequiredText};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LetterTemplate {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Letter {
    pub id: i64,
    pub user_id: Option<i64>,
    pub template_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLetter {
    pub user_id: Option<i64>,
    pub template_id: i64,
    pub title: RequiredText,
    pub content: RequiredText,
}

pub struct LetterRepo<'a> {
    db: &'a Db,
}

impl<'a> LetterRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn templates(&self) -> Result<Vec<LetterTemplate>, DbError> {
        let stmt = Statement::new(
            "SELECT id, name, category, body FROM letter_templates ORDER BY category ASC, id ASC",
        );
        self.db.query(&stmt).await
    }

    pub async fn list(&self, user_id: Option<i64>, page: Pagination) -> Result<Vec<Letter>, DbError> {
        let mut stmt = Statement::new(
            "SELECT id, user_id, template_id, title, content, created_at \
             FROM generated_letters WHERE 1=1",
        );
        stmt.and_eq("user_id", user_id)
            .push(" ORDER BY created_at DESC, id DESC")
            .limit_offset(page.limit(), page.offset());
        self.db.query(&stmt).await
    }

    /// Unknown `template_id` fails on the foreign key.
    pub async fn create(&self, letter: &NewLetter) -> Result<i64, DbError> {
        let stmt = Statement::new(
            "INSERT INTO generated_letters (user_id, template_id, title, content) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(letter.user_id)
        .bind(letter.template_id)
        .bind(letter.title.as_str())
        .bind(letter.content.as_str());

        self.db.insert(&stmt).await
    }

    /// Owning user; `None` for letters generated anonymously.
    /// Owning user of a letter; `None` for letters generated anonymously.
    pub async fn owner(&self, id: i64) -> Result<Option<i64>, DbError> {
        let stmt = Statement::new("SELECT user_id FROM generated_letters WHERE id = $1").bind(id);
        self.db
            .query_optional::<(Option<i64>,)>(&stmt)
            .await?
            .map(|(user_id,)| user_id)
            .ok_or_else(|| DbError::not_found("letter", id))
    }

    /// Delete a letter owned by `user_id`. Anonymous letters match no owner.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), DbError> {
        let stmt = Statement::new("DELETE FROM generated_letters WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id);
        if self.db.execute(&stmt).await?.rows_affected > 0 {
            return Ok(());
        }
        // Nothing deleted: missing (404 via `owner`) or someone else's.
        self.owner(id).await?;
        Err(DbError::not_owner("letter", id))
    }
}
