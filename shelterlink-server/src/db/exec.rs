//! Query and transaction helper
//!
//! [`Db`] wraps the connection pool and runs [`Statement`]s:
//!
//! - `query` / `query_optional` / `query_one` decode rows into a caller type
//! - `execute` reports affected rows
//! - `insert` runs an `INSERT ... RETURNING id` and yields the new id
//! - `execute_transaction` runs an ordered list of statements atomically
//! - `transaction` hands a callback a live connection inside a transaction
//!
//! Non-transactional calls borrow a pooled connection for the single
//! statement. Transactions commit on success and roll back on any error;
//! the connection goes back to the pool in every case.

use futures::future::BoxFuture;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Executor, FromRow, PgPool, Postgres};

use super::{DbError, Statement};

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
}

/// Pool-backed query helper shared by every repository.
#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run a SELECT and decode every row.
    pub async fn query<T>(&self, stmt: &Statement) -> Result<Vec<T>, DbError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        fetch_all(&self.pool, stmt).await
    }

    /// Run a SELECT expected to yield at most one row.
    pub async fn query_optional<T>(&self, stmt: &Statement) -> Result<Option<T>, DbError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        fetch_optional(&self.pool, stmt).await
    }

    /// Run a statement that must yield exactly one row.
    pub async fn query_one<T>(&self, stmt: &Statement) -> Result<T, DbError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        Ok(stmt.query_as::<T>().fetch_one(&self.pool).await?)
    }

    pub async fn execute(&self, stmt: &Statement) -> Result<ExecOutcome, DbError> {
        execute(&self.pool, stmt).await
    }

    /// Run an `INSERT ... RETURNING id` and return the generated id.
    pub async fn insert(&self, stmt: &Statement) -> Result<i64, DbError> {
        insert(&self.pool, stmt).await
    }

    /// Run statements in order inside one transaction.
    ///
    /// Returns one outcome per statement. If any statement fails, nothing is
    /// committed.
    pub async fn execute_transaction(
        &self,
        statements: &[Statement],
    ) -> Result<Vec<ExecOutcome>, DbError> {
        let mut tx = self.pool.begin().await?;
        let mut outcomes = Vec::with_capacity(statements.len());

        for stmt in statements {
            // Dropping `tx` on the error path rolls it back.
            outcomes.push(execute(&mut *tx, stmt).await?);
        }

        tx.commit().await?;
        tracing::debug!(statements = statements.len(), "transaction committed");
        Ok(outcomes)
    }

    /// Run a callback against a live connection inside a transaction.
    ///
    /// ```ignore
    /// let id = db
    ///     .transaction(|conn| Box::pin(async move {
    ///         let id = insert(&mut *conn, &first).await?;
    ///         execute(&mut *conn, &second).await?;
    ///         Ok(id)
    ///     }))
    ///     .await?;
    /// ```
    pub async fn transaction<F, R>(&self, f: F) -> Result<R, DbError>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<R, DbError>>,
        R: Send,
    {
        let mut tx = self.pool.begin().await?;

        match f(&mut *tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

/// Execute a statement on any executor (pool or live connection).
pub async fn execute<'c, E>(executor: E, stmt: &Statement) -> Result<ExecOutcome, DbError>
where
    E: Executor<'c, Database = Postgres>,
{
    let done = stmt.query().execute(executor).await?;
    Ok(ExecOutcome {
        rows_affected: done.rows_affected(),
    })
}

/// Run an `INSERT ... RETURNING id` on any executor.
pub async fn insert<'c, E>(executor: E, stmt: &Statement) -> Result<i64, DbError>
where
    E: Executor<'c, Database = Postgres>,
{
    let (id,) = stmt.query_as::<(i64,)>().fetch_one(executor).await?;
    Ok(id)
}

pub async fn fetch_all<'c, E, T>(executor: E, stmt: &Statement) -> Result<Vec<T>, DbError>
where
    E: Executor<'c, Database = Postgres>,
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    Ok(stmt.query_as::<T>().fetch_all(executor).await?)
}

pub async fn fetch_optional<'c, E, T>(executor: E, stmt: &Statement) -> Result<Option<T>, DbError>
where
    E: Executor<'c, Database = Postgres>,
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    Ok(stmt.query_as::<T>().fetch_optional(executor).await?)
}
