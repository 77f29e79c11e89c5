//! Tiered resource resolution
//!
//! Resolution tries the cheapest source first and stops at the first hit:
//! the local registry, then the disk cache, then every known peer in turn.
//! A full miss costs one remote search per known peer; a remote hit stops
//! the fan-out immediately. The grid assumes one authoritative publisher
//! per query — if two peers answer the same query with different content,
//! whichever is reached first wins.
//!
//! Two conditions are hard errors rather than misses: more than one object
//! matching a query at a single source (a naming invariant is broken
//! upstream) and a cache entry that exists but does not decode (persisted
//! state is corrupt).

use super::peer::{PeerId, PeerNetwork};
use crate::identity::ResourceQuery;
use crate::state::{CacheError, State, StateCache};
use log::{debug, info, warn};
use std::fmt;
use std::time::Duration;

/// Where an ambiguous result was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    Local,
    Peer(PeerId),
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchScope::Local => f.write_str("the local registry"),
            SearchScope::Peer(peer) => write!(f, "peer `{}`", peer),
        }
    }
}

/// Outcome of a failed or aborted resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No tier produced a match. Expected and recoverable: the resource is
    /// genuinely absent from the grid and the caller decides what to do.
    #[error("no resource matching `{0}` found locally, in cache, or on any known peer")]
    NotFound(ResourceQuery),

    /// More than one object matched the query at a single source. A query
    /// must name exactly one resource; this is a configuration error that
    /// must not be resolved by silently picking one.
    #[error("ambiguous result: {count} objects match `{query}` on {scope}")]
    Ambiguous {
        query: ResourceQuery,
        scope: SearchScope,
        count: usize,
    },

    /// The cache tier failed hard (corrupt entry or unreadable file).
    #[error("cache lookup for `{query}` failed: {source}")]
    Cache {
        query: ResourceQuery,
        #[source]
        source: CacheError,
    },
}

/// Successful resolution: exactly one of the three tiers answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// The object lives on the local peer.
    Local(State),
    /// The object was previously fetched and cached on disk.
    Cached(State),
    /// A remote peer holds the object; fetch it there with the same query.
    Remote { peer: PeerId, query: ResourceQuery },
}

/// Knobs for the resolver.
pub struct ResolverConfig {
    /// Root directory of the disk cache.
    pub cache_root: std::path::PathBuf,
    /// Upper bound for each remote search during fan-out.
    pub remote_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_root: StateCache::default_root(),
            remote_timeout: Duration::from_secs(30),
        }
    }
}

/// Local → cache → network resolver over an injected [`PeerNetwork`].
pub struct TieredResolver<N> {
    network: N,
    cache: StateCache,
    remote_timeout: Duration,
}

impl<N: PeerNetwork> TieredResolver<N> {
    pub fn new(network: N) -> Self {
        Self::with_config(network, ResolverConfig::default())
    }

    pub fn with_config(network: N, config: ResolverConfig) -> Self {
        Self {
            network,
            cache: StateCache::new(config.cache_root),
            remote_timeout: config.remote_timeout,
        }
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    /// Resolve `query` to an object or a remote reference.
    ///
    /// Tier order is strict and short-circuits on the first hit; see the
    /// module docs. [`ResolveError::NotFound`] is the expected outcome for
    /// a resource that does not exist anywhere on the grid.
    pub fn resolve(&self, query: &ResourceQuery) -> Result<Resolved, ResolveError> {
        // Tier 1: the local peer's own registry.
        let local = self.network.search(query);
        if local.len() > 1 {
            return Err(ResolveError::Ambiguous {
                query: query.clone(),
                scope: SearchScope::Local,
                count: local.len(),
            });
        }
        if let Some(state) = local.into_iter().next() {
            info!("resolved `{}` locally", query);
            return Ok(Resolved::Local(state));
        }
        debug!("`{}` not on the local peer", query);

        // Tier 2: the disk cache. Misses fall through; corruption does not.
        match self.cache.lookup(query) {
            Ok(Some(state)) => {
                info!("resolved `{}` from the disk cache", query);
                return Ok(Resolved::Cached(state));
            }
            Ok(None) => debug!("`{}` not in the disk cache", query),
            Err(source) => {
                return Err(ResolveError::Cache {
                    query: query.clone(),
                    source,
                })
            }
        }

        // Tier 3: ask each known peer; first peer with exactly one match
        // wins and the remaining peers are never contacted.
        for peer in self.network.known_peers() {
            let result = match self
                .network
                .request_search(query, &peer, self.remote_timeout)
            {
                Ok(states) => states,
                Err(err) => {
                    // Scoped to this peer: a dead or slow peer must not
                    // abort the whole resolution.
                    warn!("search for `{}` failed, skipping peer: {}", query, err);
                    continue;
                }
            };
            if result.len() > 1 {
                return Err(ResolveError::Ambiguous {
                    query: query.clone(),
                    scope: SearchScope::Peer(peer),
                    count: result.len(),
                });
            }
            if result.len() == 1 {
                info!("resolved `{}` remotely on peer `{}`", query, peer);
                return Ok(Resolved::Remote {
                    peer,
                    query: query.clone(),
                });
            }
        }

        Err(ResolveError::NotFound(query.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::memory::InMemoryNetwork;

    fn query() -> ResourceQuery {
        ResourceQuery::new("modelA", "vocab").unwrap()
    }

    fn resolver_with_tempdir(
        network: InMemoryNetwork,
    ) -> (TieredResolver<InMemoryNetwork>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = ResolverConfig {
            cache_root: dir.path().to_path_buf(),
            remote_timeout: Duration::from_secs(1),
        };
        (TieredResolver::with_config(network, config), dir)
    }

    #[test]
    fn test_local_hit_short_circuits() {
        let mut grid = InMemoryNetwork::new("p1");
        grid.add_peer("p2");
        let state = State::for_query(&query(), b"local".to_vec());
        grid.publish_local(state.clone());
        grid.publish_at("p2", State::for_query(&query(), b"remote".to_vec()));

        let (resolver, _dir) = resolver_with_tempdir(grid);
        let resolved = resolver.resolve(&query()).unwrap();
        assert_eq!(resolved, Resolved::Local(state));
        // The network tier was never reached.
        assert!(resolver.network().remote_searches().is_empty());
    }

    #[test]
    fn test_local_ambiguity_aborts_before_other_tiers() {
        let mut grid = InMemoryNetwork::new("p1");
        grid.add_peer("p2");
        grid.publish_local(State::for_query(&query(), b"one".to_vec()));
        grid.publish_local(State::for_query(&query(), b"two".to_vec()));
        grid.publish_at("p2", State::for_query(&query(), b"three".to_vec()));

        let (resolver, _dir) = resolver_with_tempdir(grid);
        let err = resolver.resolve(&query()).unwrap_err();
        match err {
            ResolveError::Ambiguous { scope, count, .. } => {
                assert_eq!(scope, SearchScope::Local);
                assert_eq!(count, 2);
            }
            other => panic!("expected local ambiguity, got {:?}", other),
        }
        assert!(resolver.network().remote_searches().is_empty());
    }

    #[test]
    fn test_cache_hit_skips_network() {
        let grid = InMemoryNetwork::new("p1");
        let (resolver, _dir) = resolver_with_tempdir(grid);
        let state = State::for_query(&query(), b"cached".to_vec());
        resolver.cache().store(&query(), &state).unwrap();

        let resolved = resolver.resolve(&query()).unwrap();
        assert_eq!(resolved, Resolved::Cached(state));
        assert!(resolver.network().remote_searches().is_empty());
    }

    #[test]
    fn test_empty_cache_file_falls_through_to_network() {
        let mut grid = InMemoryNetwork::new("p1");
        grid.publish_at("p2", State::for_query(&query(), b"remote".to_vec()));
        let (resolver, _dir) = resolver_with_tempdir(grid);

        let path = resolver.cache().entry_path(&query());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"").unwrap();

        let resolved = resolver.resolve(&query()).unwrap();
        assert_eq!(
            resolved,
            Resolved::Remote {
                peer: PeerId::from("p2"),
                query: query()
            }
        );
    }

    #[test]
    fn test_malformed_cache_entry_is_surfaced() {
        let mut grid = InMemoryNetwork::new("p1");
        // The answer exists on the network, but corruption must win.
        grid.publish_at("p2", State::for_query(&query(), b"remote".to_vec()));
        let (resolver, _dir) = resolver_with_tempdir(grid);

        let path = resolver.cache().entry_path(&query());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{ definitely not a state").unwrap();

        let err = resolver.resolve(&query()).unwrap_err();
        assert!(matches!(err, ResolveError::Cache { .. }));
        assert!(resolver.network().remote_searches().is_empty());
    }

    #[test]
    fn test_remote_hit_stops_fanout() {
        let mut grid = InMemoryNetwork::new("p1");
        grid.add_peer("p3");
        grid.publish_at("p2", State::for_query(&query(), b"remote".to_vec()));

        let (resolver, _dir) = resolver_with_tempdir(grid);
        let resolved = resolver.resolve(&query()).unwrap();
        assert_eq!(
            resolved,
            Resolved::Remote {
                peer: PeerId::from("p2"),
                query: query()
            }
        );
        // p2 sorts before p3 and answered; p3 must never have been asked.
        assert_eq!(resolver.network().remote_searches(), vec![PeerId::from("p2")]);
    }

    #[test]
    fn test_remote_ambiguity_is_fatal() {
        let mut grid = InMemoryNetwork::new("p1");
        grid.publish_at("p2", State::for_query(&query(), b"one".to_vec()));
        grid.publish_at("p2", State::for_query(&query(), b"two".to_vec()));

        let (resolver, _dir) = resolver_with_tempdir(grid);
        let err = resolver.resolve(&query()).unwrap_err();
        match err {
            ResolveError::Ambiguous { scope, count, .. } => {
                assert_eq!(scope, SearchScope::Peer(PeerId::from("p2")));
                assert_eq!(count, 2);
            }
            other => panic!("expected peer ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_dead_peer_is_skipped_not_fatal() {
        let mut grid = InMemoryNetwork::new("p1");
        let p2 = PeerId::from("p2");
        grid.add_peer(p2.clone());
        grid.set_offline(&p2);
        grid.publish_at("p3", State::for_query(&query(), b"remote".to_vec()));

        let (resolver, _dir) = resolver_with_tempdir(grid);
        let resolved = resolver.resolve(&query()).unwrap();
        assert_eq!(
            resolved,
            Resolved::Remote {
                peer: PeerId::from("p3"),
                query: query()
            }
        );
        assert_eq!(
            resolver.network().remote_searches(),
            vec![PeerId::from("p2"), PeerId::from("p3")]
        );
    }

    #[test]
    fn test_full_miss_is_not_found() {
        let mut grid = InMemoryNetwork::new("p1");
        grid.add_peer("p2");
        grid.add_peer("p3");

        let (resolver, _dir) = resolver_with_tempdir(grid);
        let err = resolver.resolve(&query()).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(q) if q == query()));
        // Every known peer was canvassed before giving up.
        assert_eq!(resolver.network().remote_searches().len(), 2);
    }
}
