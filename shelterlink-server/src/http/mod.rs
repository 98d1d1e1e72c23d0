//! HTTP server layer
//!
//! Axum server with:
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown
//! - `{success, data | error}` JSON envelope on every response

pub mod envelope;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use envelope::{ApiResponse, ApiResult, CreatedId};
pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
