//! GridText — shared pipeline state on a peer grid
//!
//! Resolves named pipeline resources (vocabularies, tokenizer rules,
//! trained components) across local registry, disk cache, and known peers,
//! assigns stable identity codes to strings and types, and selects SMPC
//! participants from the current peer set.

pub mod identity;
pub mod network;
pub mod state;
pub mod text;

pub use identity::{hash_string, type_code, CodeTable, ResourceQuery};
pub use network::{
    select_participants, InMemoryNetwork, MpcConfig, PeerId, PeerNetwork, Resolved, ResolveError,
    TieredResolver,
};
pub use state::{JsonStateCodec, State, StateCache, StateCodec};
