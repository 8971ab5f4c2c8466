//! Common value types for the market-data crates
//!
//! - `instrument`: directory entries and the directory itself
//! - `tick`: streaming ticks with their order-book depth
//! - `scale`: integer price to currency conversion

#![deny(clippy::all)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod instrument;
pub mod scale;
pub mod tick;

pub use instrument::{Instrument, InstrumentDirectory, InstrumentKind, OptionType};
pub use scale::PriceScale;
pub use tick::{Depth, Order, Tick};
