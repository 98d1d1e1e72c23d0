//! Database layer - connection pool, query helper and repositories
//!
//! # Design Principles
//!
//! - One pool shared by every request - no Arc<Mutex<Connection>>
//! - SQL is built with bound placeholders, never string-interpolated values
//! - Rely on DB constraints for referential integrity
//! - Transactions for every multi-step write

pub mod error;
pub mod exec;
pub mod migrations;
pub mod nearby;
pub mod pool;
pub mod repos;
pub mod statement;

pub use error::DbError;
pub use exec::{Db, ExecOutcome};
pub use nearby::NearbyQuery;
pub use pool::{create_pool, create_pool_from_config, create_pool_with_options, DbConfig};
pub use statement::{SqlValue, Statement};
pub use sqlx::PgPool;
