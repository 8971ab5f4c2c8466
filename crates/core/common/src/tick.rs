//! Streaming tick types
//!
//! All price and quantity fields are raw wire integers. Use
//! [`crate::PriceScale`] with the instrument's segment to read them as
//! currency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One order-book price level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    /// Level price
    pub price: u32,
    /// Total quantity resting at the level
    pub quantity: u32,
    /// Number of resting orders at the level
    pub orders: u32,
}

/// Order-book snapshot attached to a tick
///
/// Producers send buy levels best (highest) first and sell levels best
/// (lowest) first. Neither order nor length is checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Depth {
    /// Bid levels
    pub buy: Vec<Order>,
    /// Ask levels
    pub sell: Vec<Order>,
}

impl Depth {
    /// No levels on either side
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }

    /// First buy level as sent
    #[must_use]
    pub fn best_bid(&self) -> Option<&Order> {
        self.buy.first()
    }

    /// First sell level as sent
    #[must_use]
    pub fn best_ask(&self) -> Option<&Order> {
        self.sell.first()
    }
}

/// One streaming update for an instrument
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument token, joins against the directory
    pub token: u32,
    /// Last traded price
    pub last_price: u32,
    /// Last traded quantity
    pub last_traded_quantity: u32,
    /// Volume-weighted average price for the day
    pub average_traded_price: u32,
    /// Cumulative volume for the day
    pub volume_traded: u32,
    /// Aggregate pending buy quantity
    pub total_buy: u32,
    /// Aggregate pending sell quantity
    pub total_sell: u32,
    /// Day high
    pub high: u32,
    /// Day low
    pub low: u32,
    /// Day open
    pub open: u32,
    /// Previous close
    pub close: u32,
    /// Open interest, zero for non-derivatives
    pub oi: u32,
    /// Day high of open interest
    pub oi_high: u32,
    /// Day low of open interest
    pub oi_low: u32,
    /// Change against previous close
    pub price_change: u32,
    /// Last trade time, epoch seconds
    pub last_traded_timestamp: u64,
    /// Exchange packet time, epoch seconds
    pub exchange_timestamp: u64,
    /// Market depth, empty when the producer sent none
    pub depth: Depth,
}

impl Tick {
    /// Last trade time, `None` when not sent
    #[must_use]
    pub fn last_traded_at(&self) -> Option<DateTime<Utc>> {
        epoch_seconds(self.last_traded_timestamp)
    }

    /// Exchange packet time, `None` when not sent
    #[must_use]
    pub fn exchange_time(&self) -> Option<DateTime<Utc>> {
        epoch_seconds(self.exchange_timestamp)
    }
}

fn epoch_seconds(secs: u64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
}
