//! movies CLI - runs the movie rental services
//!
//! `movies serve <catalog|rentals|api|all>` starts one service, or all of
//! them in one process, against PostgreSQL or an in-memory store.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "movies",
    author,
    version,
    about = "Catalog, rentals and movies API services for the movie rental demo"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an HTTP service (catalog, rentals, api, or all)
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;
    match dotenv {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => debug!("No .env file found, using environment variables only"),
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
    }
}
