//! .env loading for the movies binary

use std::path::PathBuf;

/// Load `.env` from the current directory, if present.
///
/// Variables already set in the environment win. Runs before argument
/// parsing so `env = ...` fallbacks see the file's values; the caller
/// logs the outcome once tracing is up.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}
