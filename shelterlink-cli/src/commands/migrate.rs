//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use super::DatabaseArgs;
use shelterlink_server::db::migrations;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Create tables and seed lookup data, then exit.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = args.db.connect().await?;
    migrations::run(&pool)
        .await
        .context("Migration failed")?;
    pool.close().await;
    Ok(())
}
