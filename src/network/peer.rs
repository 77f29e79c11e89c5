//! Peer identity and the grid-registry seam
//!
//! The actual transport (RPC, discovery, membership) lives outside this
//! crate. Resolution and participant selection only need the small surface
//! captured by [`PeerNetwork`]: who the local peer is, which peers are
//! known, and local/remote tag search.

use crate::identity::ResourceQuery;
use crate::state::State;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Opaque identifier of a grid participant. Equality by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Failure to reach one peer. Scoped to that peer only: the resolver treats
/// it as "no match there" and keeps going.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("search on peer `{peer}` timed out after {timeout:?}")]
    Timeout { peer: PeerId, timeout: Duration },
    #[error("peer `{peer}` is unreachable: {reason}")]
    Unreachable { peer: PeerId, reason: String },
}

/// The injected peer registry and search transport.
///
/// One instance per process; membership is mutated elsewhere (join/leave
/// events), this crate only reads it. Mid-call membership changes are
/// tolerated as staleness, never as failures.
pub trait PeerNetwork {
    /// Identity of the local peer.
    fn local_id(&self) -> PeerId;

    /// All currently known remote-capable peers. Enumeration order is up to
    /// the implementation.
    fn known_peers(&self) -> Vec<PeerId>;

    /// Membership test.
    fn knows(&self, peer: &PeerId) -> bool {
        self.known_peers().iter().any(|p| p == peer)
    }

    /// Search the local peer's own object registry for states tagged with
    /// `query`. No transport underneath, so this cannot fail.
    fn search(&self, query: &ResourceQuery) -> Vec<State>;

    /// Ask one remote peer to search its registry, bounded by `timeout`.
    fn request_search(
        &self,
        query: &ResourceQuery,
        location: &PeerId,
        timeout: Duration,
    ) -> Result<Vec<State>, TransportError>;
}
