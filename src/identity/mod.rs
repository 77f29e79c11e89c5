//! Identity module — deterministic naming for the GridText grid
//!
//! Everything that needs a stable identity — token strings, serializable
//! type names, resource queries — is keyed off a single hash function with
//! a frozen algorithm and seed, so identities survive process restarts and
//! agree across peers.

mod codes;
mod query;

pub use codes::{type_code, CodeCollisionError, CodeTable};
pub use query::{QueryError, ResourceQuery, QUERY_SEPARATOR};

use xxhash_rust::xxh64::xxh64;

/// Frozen hash seed. Changing this breaks every identity persisted by an
/// older build, so it is a constant rather than a configuration knob.
const HASH_SEED: u64 = 1;

/// Hash a string to its 64-bit identity key.
///
/// Deterministic across calls and across processes: XXH64 with the frozen
/// seed above.
/// Collision resistance is what a 64-bit non-cryptographic hash gives you —
/// fine for namespacing, not for adversarial input.
pub fn hash_string(text: &str) -> u64 {
    xxh64(text.as_bytes(), HASH_SEED)
}
