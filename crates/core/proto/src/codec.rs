//! Encode and decode operations
//!
//! Every function here is a pure transformation with no shared state.
//! Encoding is deterministic: fields go out in ascending field-number
//! order and zero-valued scalars are omitted.

use crate::error::CodecError;
use crate::wire::{Data, Map, Ticker};
use common::{InstrumentDirectory, Tick};
use prost::Message;
use tracing::debug;

/// Decode an instrument directory (`Map`)
///
/// # Errors
/// `MalformedInput` when the bytes are truncated, carry an invalid varint,
/// or use the wrong wire type for a known field.
pub fn decode_directory(bytes: &[u8]) -> Result<InstrumentDirectory, CodecError> {
    let map = Map::decode(bytes).map_err(|e| malformed("Map", bytes.len(), e))?;
    Ok(map.into())
}

/// Encode an instrument directory (`Map`)
#[must_use]
pub fn encode_directory(directory: &InstrumentDirectory) -> Vec<u8> {
    Map::from(directory).encode_to_vec()
}

/// Decode a single tick (`Ticker`)
///
/// A missing `Depth` field yields an empty depth.
///
/// # Errors
/// `MalformedInput` under the same conditions as [`decode_directory`].
pub fn decode_tick(bytes: &[u8]) -> Result<Tick, CodecError> {
    let ticker = Ticker::decode(bytes).map_err(|e| malformed("Ticker", bytes.len(), e))?;
    Ok(ticker.into())
}

/// Encode a single tick (`Ticker`)
#[must_use]
pub fn encode_tick(tick: &Tick) -> Vec<u8> {
    Ticker::from(tick).encode_to_vec()
}

/// Decode a batch of ticks (`Data`)
///
/// # Errors
/// `MalformedInput` under the same conditions as [`decode_directory`].
pub fn decode_ticks(bytes: &[u8]) -> Result<Vec<Tick>, CodecError> {
    let data = Data::decode(bytes).map_err(|e| malformed("Data", bytes.len(), e))?;
    Ok(data.tickers.into_iter().map(Tick::from).collect())
}

/// Encode a batch of ticks (`Data`)
#[must_use]
pub fn encode_ticks(ticks: &[Tick]) -> Vec<u8> {
    Data {
        tickers: ticks.iter().map(Ticker::from).collect(),
    }
    .encode_to_vec()
}

fn malformed(kind: &'static str, len: usize, source: prost::DecodeError) -> CodecError {
    debug!(kind, len, error = %source, "Rejected malformed input");
    CodecError::malformed(kind, source)
}
