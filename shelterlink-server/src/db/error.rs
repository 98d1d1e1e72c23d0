//! Database error type

/// Errors raised by the query helper and repositories.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Any driver/database failure. Callers surface this as a generic 500.
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// The row exists but belongs to someone else.
    #[error("{resource} '{id}' is not owned by the caller")]
    NotOwner { resource: &'static str, id: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn not_owner(resource: &'static str, id: impl ToString) -> Self {
        Self::NotOwner {
            resource,
            id: id.to_string(),
        }
    }
}
