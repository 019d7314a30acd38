//! Error types for catalog loading.
//!
//! Runtime operations (simulation, view transitions, picking) are infallible;
//! only building the body catalog from JSON can fail.

use std::fmt;

/// Errors that can occur while loading or validating the body catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The JSON document could not be parsed.
    Parse(serde_json::Error),
    /// No body sits at distance 0 without a parent.
    NoStar,
    /// More than one body qualifies as the central star.
    MultipleStars { first: String, second: String },
    /// Two bodies share the same key.
    DuplicateKey(String),
    /// A body's `orbits` field names a key that does not exist.
    UnknownParent { body: String, parent: String },
    /// A body orbits another satellite (only one level of nesting is modelled).
    NestedSatellite { body: String, parent: String },
    /// Radius must be positive and finite.
    InvalidRadius(String),
    /// Every body other than the star needs a positive, finite distance.
    InvalidDistance(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "Failed to parse body catalog: {}", e),
            CatalogError::NoStar => write!(f, "Body catalog has no central star (a root body at distance 0)"),
            CatalogError::MultipleStars { first, second } => {
                write!(f, "Body catalog has more than one central star: '{}' and '{}'", first, second)
            }
            CatalogError::DuplicateKey(key) => write!(f, "Duplicate body key '{}'", key),
            CatalogError::UnknownParent { body, parent } => {
                write!(f, "Body '{}' orbits unknown body '{}'", body, parent)
            }
            CatalogError::NestedSatellite { body, parent } => {
                write!(f, "Body '{}' orbits '{}', which is itself a satellite", body, parent)
            }
            CatalogError::InvalidRadius(key) => write!(f, "Body '{}' has a non-positive radius", key),
            CatalogError::InvalidDistance(key) => write!(f, "Body '{}' has a non-positive distance", key),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}
