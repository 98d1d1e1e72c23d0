//! HTTP server command
//!
//! Applies migrations, then runs the API until Ctrl+C/SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::DatabaseArgs;
use shelterlink_server::db::migrations;
use shelterlink_server::{run_server, Db, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long, env = "CORS_PERMISSIVE")]
    pub cors_permissive: bool,

    /// Directory of static HTML pages served under /pages
    #[arg(long, env = "PAGES_DIR", default_value = "pages")]
    pub pages_dir: PathBuf,

    /// Skip running migrations at startup
    #[arg(long)]
    pub skip_migrations: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let pool = args.db.connect().await?;

    if args.skip_migrations {
        tracing::info!("Skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Migration failed")?;
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        pages_dir: args.pages_dir,
    };

    tracing::info!("Starting shelterlink server on {}", config.bind_addr);

    // Blocks until shutdown
    run_server(Db::new(pool), config)
        .await
        .context("Server error")?;

    Ok(())
}
