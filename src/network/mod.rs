//! Network module — peers, tiered resolution, and participant selection
//!
//! The transport itself is an external collaborator reached through the
//! [`PeerNetwork`] trait; everything here reads the peer registry, it never
//! mutates membership.

mod memory;
mod mpc;
mod peer;
mod resolve;

pub use memory::InMemoryNetwork;
pub use mpc::{select_participants, select_participants_with, MpcConfig};
pub use peer::{PeerId, PeerNetwork, TransportError};
pub use resolve::{Resolved, ResolveError, ResolverConfig, SearchScope, TieredResolver};
