//! Command implementations for the shelterlink CLI

pub mod migrate;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;
use shelterlink_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use shelterlink_server::db::{create_pool_from_config, create_pool_with_options, PgPool};
use shelterlink_server::DbConfig;

pub use migrate::run_migrate;
pub use serve::run_serve;

/// Database connection arguments shared by every command
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database URL (falls back to DB_HOST/DB_PORT/DB_USER/DB_PASSWORD/DB_NAME)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    /// Open the pool from the URL, or from the discrete DB_* variables.
    pub async fn connect(&self) -> Result<PgPool> {
        match &self.database_url {
            Some(url) => create_pool_with_options(url, self.max_connections)
                .await
                .context("Failed to create database pool from DATABASE_URL"),
            None => {
                let config = DbConfig::from_env();
                tracing::info!(
                    host = %config.host,
                    port = config.port,
                    database = %config.database,
                    "DATABASE_URL not set, using DB_* settings"
                );
                create_pool_from_config(&config, self.max_connections)
                    .await
                    .with_context(|| {
                        format!(
                            "Failed to connect to {}:{}/{}",
                            config.host, config.port, config.database
                        )
                    })
            }
        }
    }
}
