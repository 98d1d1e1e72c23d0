//! Charity organization directory

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::db::statement::escape_like;
use crate::db::{Db, DbError, Statement};
use crate::models::{Pagination, RequiredText};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: RequiredText,
    pub category: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

pub struct OrganizationRepo<'a> {
    db: &'a Db,
}

impl<'a> OrganizationRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// `search` matches name or description, case-insensitively.
    pub async fn list(
        &self,
        category: Option<&str>,
        search: Option<&str>,
        page: Pagination,
    ) -> Result<Vec<Organization>, DbError> {
        self.db.query(&list_statement(category, search, page)).await
    }

    pub async fn create(&self, org: &NewOrganization) -> Result<i64, DbError> {
        let stmt = Statement::new(
            "INSERT INTO organizations (name, category, description, website, phone, email, address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(org.name.as_str())
        .bind(org.category.as_deref())
        .bind(org.description.as_deref())
        .bind(org.website.as_deref())
        .bind(org.phone.as_deref())
        .bind(org.email.as_deref())
        .bind(org.address.as_deref());

        self.db.insert(&stmt).await
    }
}

fn list_statement(category: Option<&str>, search: Option<&str>, page: Pagination) -> Statement {
    let mut stmt = Statement::new(
        "SELECT id, name, category, description, website, phone, email, address, created_at \
         FROM organizations WHERE 1=1",
    );
    stmt.and_eq("category", category);
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(term));
        stmt.push(" AND (name ILIKE ")
            .push_bind(pattern.as_str())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    stmt.push(" ORDER BY name ASC, id ASC")
        .limit_offset(page.limit(), page.offset());
    stmt
}
