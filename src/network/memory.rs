//! In-process grid
//!
//! A whole grid inside one process: the local peer's registry plus a set of
//! simulated remote peers, each with its own hosted states and an online
//! flag. Peer enumeration is sorted by id, so runs are reproducible. Remote
//! searches are logged, which is what lets tests assert that resolution
//! stopped at the right tier and never contacted later peers.
//!
//! This backs the demo binary and the test suites; a production deployment
//! implements [`PeerNetwork`] over its real transport instead.

use super::peer::{PeerId, PeerNetwork, TransportError};
use crate::identity::ResourceQuery;
use crate::state::State;
use log::debug;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Default)]
struct SimPeer {
    states: Vec<State>,
    online: bool,
}

/// In-memory [`PeerNetwork`] implementation.
pub struct InMemoryNetwork {
    local: PeerId,
    local_states: Vec<State>,
    peers: BTreeMap<PeerId, SimPeer>,
    remote_log: RefCell<Vec<PeerId>>,
}

impl InMemoryNetwork {
    pub fn new(local: impl Into<PeerId>) -> Self {
        Self {
            local: local.into(),
            local_states: Vec::new(),
            peers: BTreeMap::new(),
            remote_log: RefCell::new(Vec::new()),
        }
    }

    /// Add a known peer with no hosted states.
    pub fn add_peer(&mut self, peer: impl Into<PeerId>) {
        self.peers.insert(
            peer.into(),
            SimPeer {
                states: Vec::new(),
                online: true,
            },
        );
    }

    /// Publish a state on the local peer.
    pub fn publish_local(&mut self, state: State) {
        self.local_states.push(state);
    }

    /// Publish a state on a remote peer, adding the peer if unknown.
    pub fn publish_at(&mut self, peer: impl Into<PeerId>, state: State) {
        self.peers
            .entry(peer.into())
            .or_insert_with(|| SimPeer {
                states: Vec::new(),
                online: true,
            })
            .states
            .push(state);
    }

    /// Mark a peer unreachable; searches against it fail with a transport
    /// error instead of answering.
    pub fn set_offline(&mut self, peer: &PeerId) {
        if let Some(sim) = self.peers.get_mut(peer) {
            sim.online = false;
        }
    }

    /// Peers that have been asked to search so far, in request order.
    pub fn remote_searches(&self) -> Vec<PeerId> {
        self.remote_log.borrow().clone()
    }
}

impl PeerNetwork for InMemoryNetwork {
    fn local_id(&self) -> PeerId {
        self.local.clone()
    }

    fn known_peers(&self) -> Vec<PeerId> {
        self.peers.keys().cloned().collect()
    }

    fn search(&self, query: &ResourceQuery) -> Vec<State> {
        self.local_states
            .iter()
            .filter(|state| state.matches(query))
            .cloned()
            .collect()
    }

    fn request_search(
        &self,
        query: &ResourceQuery,
        location: &PeerId,
        _timeout: Duration,
    ) -> Result<Vec<State>, TransportError> {
        self.remote_log.borrow_mut().push(location.clone());
        let sim = self
            .peers
            .get(location)
            .ok_or_else(|| TransportError::Unreachable {
                peer: location.clone(),
                reason: "unknown peer".to_string(),
            })?;
        if !sim.online {
            return Err(TransportError::Unreachable {
                peer: location.clone(),
                reason: "peer offline".to_string(),
            });
        }
        let matches: Vec<State> = sim
            .states
            .iter()
            .filter(|state| state.matches(query))
            .cloned()
            .collect();
        debug!("peer `{}`: {} match(es) for `{}`", location, matches.len(), query);
        Ok(matches)
    }
}
