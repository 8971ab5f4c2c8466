//! Wire schema and codec for market data
//!
//! Two message families share one encoding:
//! - the instrument directory (`Map` of `TickerMap`)
//! - the tick stream (`Data` of `Ticker`, each with an optional `Depth`)
//!
//! The schema is published in `proto/market_data.proto`; the message
//! structs in [`wire`] carry the same field numbers. Callers work with the
//! domain types from `common` through the functions in [`codec`].

#![deny(clippy::all)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod wire;

pub use codec::{
    decode_directory, decode_tick, decode_ticks, encode_directory, encode_tick, encode_ticks,
};
pub use error::CodecError;
