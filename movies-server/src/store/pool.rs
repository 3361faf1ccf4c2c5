//! Database connection pool management
//!
//! The pool is lazy: no connection is opened until the first query, so a
//! service starts and answers health checks while the database is still
//! coming up.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Default maximum connections for the pool.
/// Kept low; every service issues at most one query per request.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long a request waits for a connection before the query fails.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Create a lazy PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error only if `database_url` cannot be parsed.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/movies")?;
/// ```
pub fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS)
}

/// Create a lazy PostgreSQL connection pool with custom options.
pub fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(database_url)
}
