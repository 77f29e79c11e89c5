//! Disk cache of previously fetched states
//!
//! Layout mirrors the query structure: one subdirectory per namespace, file
//! name is the query with its separator swapped for `-`:
//!
//! ```text
//! <root>/<namespace>/<namespace>-<name>.<ext>
//! ```
//!
//! The resolver only reads the cache; population is the fetch layer's job.
//! A missing or zero-length entry is a miss. An entry that exists but does
//! not decode is a hard error — it means persisted state is corrupt, which
//! must not be papered over by falling through to the network.

use super::codec::{CodecError, JsonStateCodec, StateCodec};
use super::State;
use crate::identity::ResourceQuery;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors from cache access. Absence is not an error; `lookup` reports a
/// miss as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache i/o on {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache entry {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

/// Read-side view of the on-disk state cache.
pub struct StateCache {
    root: PathBuf,
    codec: Box<dyn StateCodec>,
}

impl StateCache {
    /// Cache rooted at `root`, JSON codec.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_codec(root, Box::new(JsonStateCodec))
    }

    pub fn with_codec(root: impl Into<PathBuf>, codec: Box<dyn StateCodec>) -> Self {
        Self {
            root: root.into(),
            codec,
        }
    }

    /// Default cache root: `<home>/GridText/cache`, falling back to a
    /// relative directory when no home directory is known.
    pub fn default_root() -> PathBuf {
        match dirs::home_dir() {
            Some(home) => home.join("GridText").join("cache"),
            None => PathBuf::from("GridText").join("cache"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the entry for `query` lives, whether or not it exists.
    pub fn entry_path(&self, query: &ResourceQuery) -> PathBuf {
        self.root
            .join(query.namespace())
            .join(format!("{}.{}", query.cache_key(), self.codec.extension()))
    }

    /// Look up the cached state for `query`.
    ///
    /// `Ok(None)` when the entry is absent or zero-length.
    pub fn lookup(&self, query: &ResourceQuery) -> Result<Option<State>, CacheError> {
        let path = self.entry_path(query);
        let len = match fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(_) => {
                debug!("cache miss for `{}`: no entry at {}", query, path.display());
                return Ok(None);
            }
        };
        if len == 0 {
            debug!("cache miss for `{}`: zero-length entry", query);
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;
        let state = self
            .codec
            .decode(&bytes)
            .map_err(|source| CacheError::Malformed { path, source })?;
        Ok(Some(state))
    }

    /// Write an entry. Used by the fetch layer that populates the cache and
    /// by tests; the resolver itself never calls this.
    pub fn store(&self, query: &ResourceQuery, state: &State) -> Result<(), CacheError> {
        let path = self.entry_path(query);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let bytes = self.codec.encode(state).map_err(|source| CacheError::Malformed {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, bytes).map_err(|source| CacheError::Io { path, source })
    }
}
