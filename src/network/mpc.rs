//! SMPC participant selection
//!
//! Before encrypting a value with additive secret sharing, the grid picks
//! which peers hold the shares (`node_0`, `node_1`) and which supplies the
//! cryptographic auxiliary material (`crypto_provider`). The local peer
//! never holds its own shares, so it is excluded up front. Selection is a
//! fresh random draw on every call.
//!
//! TODO: pick share holders by capability/locality instead of uniformly at
//! random once the grid carries peer metadata to rank them by.

use super::peer::{PeerId, PeerNetwork};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Chosen participants for one SMPC encryption.
///
/// With only two eligible peers the provider role is not left empty:
/// `crypto_provider` is set to the same peer as `node_1`, a deliberate
/// compatibility behavior even though it voids the share-holder/provider
/// separation. Gate on [`MpcConfig::is_degenerate`] where that separation
/// is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpcConfig {
    pub node_0: PeerId,
    pub node_1: PeerId,
    pub crypto_provider: PeerId,
}

impl MpcConfig {
    /// Role assignments in protocol order.
    pub fn roles(&self) -> [(&'static str, &PeerId); 3] {
        [
            ("node_0", &self.node_0),
            ("node_1", &self.node_1),
            ("crypto_provider", &self.crypto_provider),
        ]
    }

    /// The two share-holding peers.
    pub fn share_holders(&self) -> [&PeerId; 2] {
        [&self.node_0, &self.node_1]
    }

    /// Whether one peer is doubling as share holder and crypto provider.
    pub fn is_degenerate(&self) -> bool {
        self.crypto_provider == self.node_0 || self.crypto_provider == self.node_1
    }
}

/// Select SMPC participants from the known peers, excluding `self_id`.
///
/// `None` when fewer than two other peers exist — not an error, the grid is
/// simply too small for secret sharing. Selection is randomized and not
/// repeatable across calls for the same peer set.
pub fn select_participants<N: PeerNetwork>(network: &N, self_id: &PeerId) -> Option<MpcConfig> {
    select_participants_with(network, self_id, &mut rand::thread_rng())
}

/// [`select_participants`] with an injected randomness source.
pub fn select_participants_with<N, R>(
    network: &N,
    self_id: &PeerId,
    rng: &mut R,
) -> Option<MpcConfig>
where
    N: PeerNetwork,
    R: Rng + ?Sized,
{
    let mut eligible: Vec<PeerId> = network
        .known_peers()
        .into_iter()
        .filter(|peer| peer != self_id)
        .collect();

    if eligible.len() < 2 {
        debug!(
            "{} eligible peer(s): not enough for secret sharing",
            eligible.len()
        );
        return None;
    }

    if eligible.len() == 2 {
        // Two peers hold the shares and one of them doubles as the crypto
        // provider rather than leaving the role unassigned.
        let node_1 = eligible.pop()?;
        let node_0 = eligible.pop()?;
        return Some(MpcConfig {
            node_0,
            crypto_provider: node_1.clone(),
            node_1,
        });
    }

    // Three or more: draw three distinct peers uniformly, assigned to the
    // roles in draw order.
    let (drawn, _) = eligible.partial_shuffle(rng, 3);
    Some(MpcConfig {
        node_0: drawn[0].clone(),
        node_1: drawn[1].clone(),
        crypto_provider: drawn[2].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::memory::InMemoryNetwork;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid_with_peers(peers: &[&str]) -> InMemoryNetwork {
        let mut grid = InMemoryNetwork::new("me");
        for peer in peers {
            grid.add_peer(*peer);
        }
        grid
    }

    #[test]
    fn test_single_peer_yields_none() {
        let grid = grid_with_peers(&["p1"]);
        assert_eq!(select_participants(&grid, &grid.local_id()), None);
    }

    #[test]
    fn test_no_peers_yields_none() {
        let grid = grid_with_peers(&[]);
        assert_eq!(select_participants(&grid, &grid.local_id()), None);
    }

    #[test]
    fn test_self_is_excluded_from_eligibility() {
        // Two known peers, but one of them is the selecting peer itself.
        let mut grid = grid_with_peers(&["p1"]);
        grid.add_peer("me");
        assert_eq!(select_participants(&grid, &grid.local_id()), None);
    }

    #[test]
    fn test_two_peers_doubles_the_provider() {
        let grid = grid_with_peers(&["a", "b"]);
        let config = select_participants(&grid, &grid.local_id()).unwrap();
        assert_eq!(config.node_0, PeerId::from("a"));
        assert_eq!(config.node_1, PeerId::from("b"));
        assert_eq!(config.crypto_provider, config.node_1);
        assert!(config.is_degenerate());
    }

    #[test]
    fn test_three_or_more_gives_distinct_roles() {
        let grid = grid_with_peers(&["p1", "p2", "p3", "p4", "p5"]);
        let me = grid.local_id();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let config = select_participants_with(&grid, &me, &mut rng).unwrap();
            let [n0, n1, cp] = [&config.node_0, &config.node_1, &config.crypto_provider];
            assert_ne!(n0, n1);
            assert_ne!(n0, cp);
            assert_ne!(n1, cp);
            assert!(!config.is_degenerate());
            for peer in [n0, n1, cp] {
                assert_ne!(*peer, me);
                assert!(grid.knows(peer));
            }
        }
    }

    #[test]
    fn test_roles_are_ordered() {
        let grid = grid_with_peers(&["a", "b"]);
        let config = select_participants(&grid, &grid.local_id()).unwrap();
        let names: Vec<&str> = config.roles().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["node_0", "node_1", "crypto_provider"]);
    }
}
