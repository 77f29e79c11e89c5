//! Canonical resource queries
//!
//! A resource on the grid is addressed by `namespace:name` — e.g.
//! `sentiment-en:vocab` for the vocabulary of the `sentiment-en` pipeline.
//! The query string is the search tag on the owning peer, the lookup key
//! for remote search, and (separator swapped) the cache file name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the namespace and name segments. Reserved: neither
/// segment may contain it, otherwise the query cannot be split back.
pub const QUERY_SEPARATOR: char = ':';

/// Separator used in cache file names, where `:` is not filesystem-safe.
pub(crate) const CACHE_SEPARATOR: char = '-';

/// Errors from building or parsing a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("segment `{0}` contains the reserved separator `{QUERY_SEPARATOR}`")]
    SeparatorInSegment(String),
    #[error("`{0}` is not a `namespace{QUERY_SEPARATOR}name` query")]
    Malformed(String),
}

/// Canonical identifier of a shared resource: `namespace:name`.
///
/// Immutable once built; two queries are equal iff their string forms are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceQuery(String);

impl ResourceQuery {
    /// Build the canonical query for a named resource.
    ///
    /// Rejects segments containing [`QUERY_SEPARATOR`] — silently producing
    /// an ambiguous query would corrupt every lookup downstream.
    pub fn new(namespace: &str, name: &str) -> Result<Self, QueryError> {
        for segment in [namespace, name] {
            if segment.contains(QUERY_SEPARATOR) {
                return Err(QueryError::SeparatorInSegment(segment.to_string()));
            }
        }
        Ok(Self(format!("{}{}{}", namespace, QUERY_SEPARATOR, name)))
    }

    /// Parse a canonical query string back into a query.
    ///
    /// Exact inverse of [`ResourceQuery::new`]: exactly one separator.
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        match text.split(QUERY_SEPARATOR).count() {
            2 => Ok(Self(text.to_string())),
            _ => Err(QueryError::Malformed(text.to_string())),
        }
    }

    /// The namespace segment (pipeline the resource belongs to).
    pub fn namespace(&self) -> &str {
        self.0
            .split(QUERY_SEPARATOR)
            .next()
            .unwrap_or_default()
    }

    /// The name segment (resource within the namespace).
    pub fn name(&self) -> &str {
        self.0
            .split(QUERY_SEPARATOR)
            .nth(1)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe form of the query, used as the cache file stem.
    pub fn cache_key(&self) -> String {
        self.0.replace(QUERY_SEPARATOR, &CACHE_SEPARATOR.to_string())
    }
}

impl fmt::Display for ResourceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
