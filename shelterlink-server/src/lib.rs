//! shelterlink-server: HTTP API for charity services
//!
//! Shelters, food banks, dog-friendly resources, service-dog certification,
//! employment listings, letter generation, mental-health self-assessment,
//! notifications and GDPR consent over a single Postgres pool.
//!
//! - [`db`]: pool, statement builder, query/transaction helper, migrations
//!   and repositories
//! - [`models`]: validated input types, pagination and geo search
//! - [`http`]: axum router, envelope and error mapping

pub mod db;
pub mod http;
pub mod models;

pub use db::{Db, DbConfig, DbError};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
