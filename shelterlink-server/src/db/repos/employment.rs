//! Employment opportunity listings

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::db::statement::escape_like;
use crate::db::{Db, DbError, Statement};
use crate::models::{Pagination, RequiredText};

const COLUMNS: &str = "id, title, employer, location, job_type, remote, description, \
                       salary_range, apply_url, posted_at";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: i64,
    pub title: String,
    pub employer: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub remote: bool,
    pub description: Option<String>,
    pub salary_range: Option<String>,
    pub apply_url: Option<String>,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOpportunity {
    pub title: RequiredText,
    pub employer: RequiredText,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub remote: bool,
    pub description: Option<String>,
    pub salary_range: Option<String>,
    pub apply_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OpportunityFilter {
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub remote: Option<bool>,
    pub search: Option<String>,
}

pub struct EmploymentRepo<'a> {
    db: &'a Db,
}

impl<'a> EmploymentRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Newest postings first.
    pub async fn list(
        &self,
        filter: &OpportunityFilter,
        page: Pagination,
    ) -> Result<Vec<Opportunity>, DbError> {
        self.db.query(&list_statement(filter, page)).await
    }

    pub async fn get(&self, id: i64) -> Result<Opportunity, DbError> {
        let stmt = Statement::new(format!(
            "SELECT {COLUMNS} FROM employment_opportunities WHERE id = $1"
        ))
        .bind(id);
        self.db
            .query_optional(&stmt)
            .await?
            .ok_or_else(|| DbError::not_found("employment opportunity", id))
    }

    pub async fn create(&self, job: &NewOpportunity) -> Result<i64, DbError> {
        let stmt = Statement::new(
            "INSERT INTO employment_opportunities (title, employer, location, job_type, remote, \
             description, salary_range, apply_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
        )
        .bind(job.title.as_str())
        .bind(job.employer.as_str())
        .bind(job.location.as_deref())
        .bind(job.job_type.as_deref())
        .bind(job.remote)
        .bind(job.description.as_deref())
        .bind(job.salary_range.as_deref())
        .bind(job.apply_url.as_deref());

        self.db.insert(&stmt).await
    }
}

fn list_statement(filter: &OpportunityFilter, page: Pagination) -> Statement {
    let mut stmt = Statement::new(format!(
        "SELECT {COLUMNS} FROM employment_opportunities WHERE 1=1"
    ));
    stmt.and_contains("location", filter.location.as_deref())
        .and_eq("job_type", filter.job_type.as_deref())
        .and_eq("remote", filter.remote);

    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(term));
        stmt.push(" AND (title ILIKE ")
            .push_bind(pattern.as_str())
            .push(" OR employer ILIKE ")
            .push_bind(pattern.as_str())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    stmt.push(" ORDER BY posted_at DESC, id DESC")
        .limit_offset(page.limit(), page.offset());
    stmt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqlValue;

    #[test]
    fn filters_number_placeholders_in_order() {
        let filter = OpportunityFilter {
            location: Some("Leeds".into()),
            job_type: Some("part-time".into()),
            remote: Some(true),
            search: Some("kitchen".into()),
        };
        let stmt = list_statement(&filter, Pagination::default());
        let sql = stmt.sql();

        assert!(sql.contains("location ILIKE $1"));
        assert!(sql.contains("job_type = $2"));
        assert!(sql.contains("remote = $3"));
        assert!(sql.contains("(title ILIKE $4 OR employer ILIKE $5 OR description ILIKE $6)"));
        assert!(sql.ends_with("LIMIT $7 OFFSET $8"));
        assert_eq!(stmt.values()[2], SqlValue::Bool(Some(true)));
    }
}
