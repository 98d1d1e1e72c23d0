//! shelterlink CLI - runs the ShelterLink HTTP API
//!
//! - `serve`: apply migrations and run the HTTP server
//! - `migrate`: apply migrations and exit
//!
//! A `.env` file in the working directory is loaded before arguments are
//! parsed, so every `env = ...` fallback can come from it.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "shelterlink",
    author,
    version,
    about = "ShelterLink charity services API",
    long_about = "HTTP API for emergency shelters, food banks, dog-friendly resources, service-dog \
                  certification, employment, letters, wellbeing assessments and notifications."
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create tables and seed lookup data, then exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
    }
    Ok(())
}
