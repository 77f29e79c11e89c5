//! State module — the shared pipeline artifacts the grid resolves
//!
//! A `State` is the unit of sharing: an opaque, codec-encoded object (a
//! vocabulary table, tokenizer rules, trained component weights) plus the
//! search tags it is published under. Peers exchange and cache states; this
//! crate never looks inside the payload.

mod cache;
mod codec;

pub use cache::{CacheError, StateCache};
pub use codec::{CodecError, JsonStateCodec, StateCodec};

use crate::identity::ResourceQuery;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shareable snapshot of one pipeline component's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Unique id of this snapshot.
    pub id: String,
    /// Search tags; publishing under a query means tagging with its string.
    pub tags: Vec<String>,
    /// Codec-encoded component object. Opaque to the grid.
    pub payload: Vec<u8>,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
}

impl State {
    pub fn new(tags: Vec<String>, payload: Vec<u8>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tags,
            payload,
            created_at: Utc::now(),
        }
    }

    /// Convenience for the common case of publishing under a single query.
    pub fn for_query(query: &ResourceQuery, payload: Vec<u8>) -> Self {
        Self::new(vec![query.as_str().to_string()], payload)
    }

    /// Whether this state is published under `query`.
    pub fn matches(&self, query: &ResourceQuery) -> bool {
        self.tags.iter().any(|tag| tag == query.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_query_matches() {
        let query = ResourceQuery::new("sentiment-en", "vocab").unwrap();
        let other = ResourceQuery::new("sentiment-en", "tokenizer").unwrap();
        let state = State::for_query(&query, b"weights".to_vec());
        assert!(state.matches(&query));
        assert!(!state.matches(&other));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = State::new(vec![], vec![]);
        let b = State::new(vec![], vec![]);
        assert_ne!(a.id, b.id);
    }
}
