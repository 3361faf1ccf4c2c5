//! Built-in seed collections
//!
//! Seed files are `{"results": [...]}` objects, embedded at compile time.
//! Every document must carry its key field (`id`, or `Userid` for users);
//! it becomes the document key.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{MoviesError, Result};
use crate::model::DocumentId;

const CATALOG_JSON: &str = include_str!("../data/catalog.json");
const MOVIES_JSON: &str = include_str!("../data/movies.json");
const WATCHING_JSON: &str = include_str!("../data/watching.json");
const USERS_JSON: &str = include_str!("../data/users.json");

/// A named built-in collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedSet {
    Catalog,
    Movies,
    Watching,
    Users,
}

impl SeedSet {
    pub const ALL: [SeedSet; 4] = [
        SeedSet::Catalog,
        SeedSet::Movies,
        SeedSet::Watching,
        SeedSet::Users,
    ];

    /// Collection name the set is loaded into
    pub fn name(self) -> &'static str {
        match self {
            SeedSet::Catalog => "catalog",
            SeedSet::Movies => "movies",
            SeedSet::Watching => "watching",
            SeedSet::Users => "users",
        }
    }

    /// Field holding the document key
    pub fn key_field(self) -> &'static str {
        match self {
            SeedSet::Users => "Userid",
            _ => "id",
        }
    }

    fn raw(self) -> &'static str {
        match self {
            SeedSet::Catalog => CATALOG_JSON,
            SeedSet::Movies => MOVIES_JSON,
            SeedSet::Watching => WATCHING_JSON,
            SeedSet::Users => USERS_JSON,
        }
    }

    /// Parse the embedded documents of this set.
    pub fn documents(self) -> Result<Vec<SeedDocument>> {
        parse_seed(self.name(), self.key_field(), self.raw())
    }
}

impl fmt::Display for SeedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One document from a seed file, with its key extracted
#[derive(Debug, Clone, PartialEq)]
pub struct SeedDocument {
    pub id: DocumentId,
    pub body: Map<String, Value>,
}

#[derive(Deserialize)]
struct SeedFile {
    results: Vec<Map<String, Value>>,
}

/// Parse a `{"results": [...]}` seed file keyed by `key_field`.
pub fn parse_seed(context: &str, key_field: &str, raw: &str) -> Result<Vec<SeedDocument>> {
    let file: SeedFile = serde_json::from_str(raw).map_err(|e| MoviesError::json(context, e))?;

    file.results
        .into_iter()
        .map(|body| {
            let value = body
                .get(key_field)
                .ok_or_else(|| MoviesError::missing_field(key_field, context))?;
            let id = DocumentId::from_value(value)
                .ok_or_else(|| MoviesError::invalid_id(value.to_string(), context))?;
            Ok(SeedDocument { id, body })
        })
        .collect()
}
