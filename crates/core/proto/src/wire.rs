//! Protobuf message definitions
//!
//! Mirrors `proto/market_data.proto` field for field. Zero-valued scalars
//! are not written and decode back to zero; unknown fields are skipped.

#![allow(missing_docs)]

use common::{Depth as DomainDepth, Instrument, InstrumentDirectory, Order as DomainOrder, Tick};

/// Directory entry
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TickerMap {
    #[prost(uint32, tag = "1")]
    pub token: u32,
    #[prost(string, tag = "2")]
    pub trading_symbol: String,
    #[prost(string, tag = "3")]
    pub exchange: String,
    #[prost(string, tag = "4")]
    pub name: String,
    #[prost(string, tag = "5")]
    pub expiry: String,
    #[prost(double, tag = "6")]
    pub strike: f64,
    #[prost(double, tag = "7")]
    pub tick_size: f64,
    #[prost(uint32, tag = "8")]
    pub lot_size: u32,
    #[prost(string, tag = "9")]
    pub instrument_type: String,
    #[prost(string, tag = "10")]
    pub segment: String,
}

/// Instrument directory
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Map {
    #[prost(message, repeated, tag = "1")]
    pub ticker_map: Vec<TickerMap>,
}

/// Order-book level
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Order {
    #[prost(uint32, tag = "1")]
    pub price: u32,
    #[prost(uint32, tag = "2")]
    pub quantity: u32,
    #[prost(uint32, tag = "3")]
    pub orders: u32,
}

/// Market depth
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Depth {
    #[prost(message, repeated, tag = "1")]
    pub buy: Vec<Order>,
    #[prost(message, repeated, tag = "2")]
    pub sell: Vec<Order>,
}

/// Streaming tick
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Ticker {
    #[prost(uint32, tag = "1")]
    pub token: u32,
    #[prost(uint32, tag = "2")]
    pub last_price: u32,
    #[prost(uint32, tag = "3")]
    pub last_traded_quantity: u32,
    #[prost(uint32, tag = "4")]
    pub average_traded_price: u32,
    #[prost(uint32, tag = "5")]
    pub volume_traded: u32,
    #[prost(uint32, tag = "6")]
    pub total_buy: u32,
    #[prost(uint32, tag = "7")]
    pub total_sell: u32,
    #[prost(uint32, tag = "8")]
    pub high: u32,
    #[prost(uint32, tag = "9")]
    pub low: u32,
    #[prost(uint32, tag = "10")]
    pub open: u32,
    #[prost(uint32, tag = "11")]
    pub close: u32,
    #[prost(uint32, tag = "12")]
    pub oi: u32,
    #[prost(uint32, tag = "13")]
    pub oi_high: u32,
    #[prost(uint32, tag = "14")]
    pub oi_low: u32,
    #[prost(uint32, tag = "15")]
    pub price_change: u32,
    #[prost(uint64, tag = "16")]
    pub last_traded_timestamp: u64,
    #[prost(uint64, tag = "17")]
    pub exchange_timestamp: u64,
    #[prost(message, optional, tag = "18")]
    pub depth: Option<Depth>,
}

/// Batch of ticks as sent on the stream
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Data {
    #[prost(message, repeated, tag = "1")]
    pub tickers: Vec<Ticker>,
}

impl From<TickerMap> for Instrument {
    fn from(m: TickerMap) -> Self {
        Self {
            token: m.token,
            trading_symbol: m.trading_symbol,
            exchange: m.exchange,
            name: m.name,
            expiry: m.expiry,
            strike: m.strike,
            tick_size: m.tick_size,
            lot_size: m.lot_size,
            instrument_type: m.instrument_type,
            segment: m.segment,
        }
    }
}

impl From<&Instrument> for TickerMap {
    fn from(i: &Instrument) -> Self {
        Self {
            token: i.token,
            trading_symbol: i.trading_symbol.clone(),
            exchange: i.exchange.clone(),
            name: i.name.clone(),
            expiry: i.expiry.clone(),
            strike: i.strike,
            tick_size: i.tick_size,
            lot_size: i.lot_size,
            instrument_type: i.instrument_type.clone(),
            segment: i.segment.clone(),
        }
    }
}

impl From<Map> for InstrumentDirectory {
    fn from(map: Map) -> Self {
        map.ticker_map.into_iter().map(Instrument::from).collect()
    }
}

impl From<&InstrumentDirectory> for Map {
    fn from(directory: &InstrumentDirectory) -> Self {
        Self {
            ticker_map: directory.iter().map(TickerMap::from).collect(),
        }
    }
}

impl From<Order> for DomainOrder {
    fn from(o: Order) -> Self {
        Self {
            price: o.price,
            quantity: o.quantity,
            orders: o.orders,
        }
    }
}

impl From<DomainOrder> for Order {
    fn from(o: DomainOrder) -> Self {
        Self {
            price: o.price,
            quantity: o.quantity,
            orders: o.orders,
        }
    }
}

impl From<Depth> for DomainDepth {
    fn from(d: Depth) -> Self {
        Self {
            buy: d.buy.into_iter().map(DomainOrder::from).collect(),
            sell: d.sell.into_iter().map(DomainOrder::from).collect(),
        }
    }
}

impl From<&DomainDepth> for Depth {
    fn from(d: &DomainDepth) -> Self {
        Self {
            buy: d.buy.iter().copied().map(Order::from).collect(),
            sell: d.sell.iter().copied().map(Order::from).collect(),
        }
    }
}

impl From<Ticker> for Tick {
    fn from(t: Ticker) -> Self {
        Self {
            token: t.token,
            last_price: t.last_price,
            last_traded_quantity: t.last_traded_quantity,
            average_traded_price: t.average_traded_price,
            volume_traded: t.volume_traded,
            total_buy: t.total_buy,
            total_sell: t.total_sell,
            high: t.high,
            low: t.low,
            open: t.open,
            close: t.close,
            oi: t.oi,
            oi_high: t.oi_high,
            oi_low: t.oi_low,
            price_change: t.price_change,
            last_traded_timestamp: t.last_traded_timestamp,
            exchange_timestamp: t.exchange_timestamp,
            depth: t.depth.map(DomainDepth::from).unwrap_or_default(),
        }
    }
}

impl From<&Tick> for Ticker {
    fn from(t: &Tick) -> Self {
        Self {
            token: t.token,
            last_price: t.last_price,
            last_traded_quantity: t.last_traded_quantity,
            average_traded_price: t.average_traded_price,
            volume_traded: t.volume_traded,
            total_buy: t.total_buy,
            total_sell: t.total_sell,
            high: t.high,
            low: t.low,
            open: t.open,
            close: t.close,
            oi: t.oi,
            oi_high: t.oi_high,
            oi_low: t.oi_low,
            price_change: t.price_change,
            last_traded_timestamp: t.last_traded_timestamp,
            exchange_timestamp: t.exchange_timestamp,
            // An empty book is left off the wire
            depth: (!t.depth.is_empty()).then(|| Depth::from(&t.depth)),
        }
    }
}
