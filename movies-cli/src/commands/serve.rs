//! HTTP server command
//!
//! Runs one of the movie services, or all of them in one process.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use movies_core::config::{resolve_database_url, DEFAULT_BIND, DEFAULT_CATALOG_URL};
use movies_core::SeedSet;
use movies_server::{
    create_pool, run_server, seed, AppState, CatalogSource, DocumentStore, HttpCatalog,
    MemoryDocumentStore, PgDocumentStore, ServerConfig, Service, StoreCatalog,
};

/// Service selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceArg {
    /// GET /catalog
    Catalog,
    /// GET /rentals, POST /rent, POST /rent/return
    Rentals,
    /// GET /api/movies, GET /api/watching, GET /users
    Api,
    /// All services in one process; rentals reads the catalog locally
    All,
}

impl From<ServiceArg> for Service {
    fn from(arg: ServiceArg) -> Self {
        match arg {
            ServiceArg::Catalog => Service::Catalog,
            ServiceArg::Rentals => Service::Rentals,
            ServiceArg::Api => Service::Api,
            ServiceArg::All => Service::All,
        }
    }
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Service to run
    #[arg(value_enum)]
    pub service: ServiceArg,

    /// Address to bind to
    #[arg(long, short = 'b', env = "MOVIES_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Database URL (default: composed from DB_HOST, DB_PORT, DB_USERNAME, DB_PASSWORD, DB_DATABASE)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Catalog service base URL, used by the rentals service
    #[arg(long, env = "CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Keep documents in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub in_memory: bool,

    /// Load the built-in catalog, movie lists and users at startup
    #[arg(long)]
    pub seed: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

fn open_store(args: &ServeArgs) -> Result<Arc<dyn DocumentStore>> {
    if args.in_memory {
        tracing::warn!("Using in-memory store; documents are lost on exit");
        return Ok(Arc::new(MemoryDocumentStore::new()));
    }

    let database_url = resolve_database_url(args.database_url.clone())
        .context("No database configured. Set --database-url, DATABASE_URL or DB_HOST, or pass --in-memory")?;
    let pool = create_pool(&database_url).context("Invalid database URL")?;
    Ok(Arc::new(PgDocumentStore::new(pool)))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let service = Service::from(args.service);
    let timeout = Duration::from_secs(args.timeout);

    let store = open_store(&args)?;

    if args.seed {
        for set in SeedSet::ALL {
            seed(store.as_ref(), set)
                .await
                .with_context(|| format!("Failed to seed {set}"))?;
        }
    }

    let catalog: Arc<dyn CatalogSource> = if service == Service::All {
        Arc::new(StoreCatalog::new(store.clone()))
    } else {
        tracing::info!("Catalog service at {}", args.catalog_url);
        Arc::new(
            HttpCatalog::new(&args.catalog_url, timeout)
                .context("Failed to build catalog HTTP client")?,
        )
    };

    let config = ServerConfig {
        bind_addr: args.bind,
        service,
        request_timeout: timeout,
        cors_permissive: args.cors_permissive,
    };

    run_server(AppState::new(store, catalog), config)
        .await
        .context("Server error")?;

    Ok(())
}
