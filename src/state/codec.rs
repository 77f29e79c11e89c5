//! Pluggable persistence codec
//!
//! How a `State` is turned into bytes on disk is an external concern; the
//! cache only needs encode/decode and a file extension. JSON is the stock
//! codec, matching the rest of the grid's interchange format.

use super::State;

/// Errors from encoding or decoding a persisted state.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("state serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialization strategy for persisted states.
pub trait StateCodec {
    /// File extension (without the dot) for entries written by this codec.
    fn extension(&self) -> &'static str;

    fn encode(&self, state: &State) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<State, CodecError>;
}

/// Stock serde_json codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStateCodec;

impl StateCodec for JsonStateCodec {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, state: &State) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(state)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<State, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
