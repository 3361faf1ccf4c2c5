//! Document types shared by the catalog, rentals and movies API services
//!
//! Documents are flat JSON objects. The typed structs name the fields the
//! services read; anything else stored in a document rides along in `extra`
//! so a read returns what was written.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Identifier of a stored document.
///
/// Seed files carry numeric ids while clients echo them back as strings, so
/// both forms are accepted and normalised to the decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Read an id out of a JSON value, if it is a string or an integer.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a string or integer id, got {value}"))
        })
    }
}

/// Accept a price sent as a JSON number or as a numeric string.
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid price '{s}'"))),
        Some(other) => Err(serde::de::Error::custom(format!("invalid price {other}"))),
    }
}

/// A rentable movie from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A record that a catalog item has been rented.
///
/// Keyed by the catalog id: renting the same movie twice overwrites the
/// previous record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: DocumentId,
    pub catalog_id: DocumentId,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rental {
    pub fn new(catalog_id: DocumentId, price: Option<f64>) -> Self {
        Self {
            id: catalog_id.clone(),
            catalog_id,
            price,
            extra: Map::new(),
        }
    }
}

/// Body of `POST /rent`
#[derive(Debug, Clone, Deserialize)]
pub struct RentRequest {
    pub catalog_id: DocumentId,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
}

/// Body of `POST /rent/return`
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnRequest {
    pub catalog_id: DocumentId,
}

/// A rental joined with its catalog item.
///
/// `price` is the catalog price with the rental markup applied, not the
/// price the client sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedRental {
    pub id: DocumentId,
    pub catalog_id: DocumentId,
    pub price: Option<f64>,
    pub vote_average: Option<f64>,
    pub original_title: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
