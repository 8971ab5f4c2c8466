//! Latest tick per instrument token
//!
//! Ticks are kept as raw wire integers. Joining against the directory
//! turns them into [`ResolvedQuote`]s with currency prices.

use crate::directory::store::InstrumentStore;
use crate::error::{FeedError, Result};
use common::{Instrument, PriceScale, Tick};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Latest tick per token
#[derive(Debug, Default)]
pub struct QuoteBook {
    quotes: RwLock<FxHashMap<u32, Tick>>,
    stale: AtomicU64,
}

impl QuoteBook {
    /// Create an empty quote book
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a tick unless it is older than the cached one
    ///
    /// Returns whether the tick was stored. Ticks without an exchange
    /// timestamp always replace the cached tick.
    pub fn apply(&self, tick: Tick) -> bool {
        let mut quotes = self.quotes.write();
        if let Some(cached) = quotes.get(&tick.token) {
            if tick.exchange_timestamp != 0 && tick.exchange_timestamp < cached.exchange_timestamp {
                self.stale.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Stale tick for {}: {} < {}",
                    tick.token, tick.exchange_timestamp, cached.exchange_timestamp
                );
                return false;
            }
        }
        quotes.insert(tick.token, tick);
        true
    }

    /// Store a batch, returns how many were stored
    pub fn apply_all(&self, ticks: impl IntoIterator<Item = Tick>) -> usize {
        ticks.into_iter().map(|t| self.apply(t)).filter(|&stored| stored).count()
    }

    /// Latest tick for a token
    #[must_use]
    pub fn get(&self, token: u32) -> Option<Tick> {
        self.quotes.read().get(&token).cloned()
    }

    /// Cached tokens, ascending
    #[must_use]
    pub fn tokens(&self) -> Vec<u32> {
        let mut tokens: Vec<u32> = self.quotes.read().keys().copied().collect();
        tokens.sort_unstable();
        tokens
    }

    /// Number of cached tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.read().len()
    }

    /// Whether nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.read().is_empty()
    }

    /// Ticks rejected as stale since creation
    #[must_use]
    pub fn stale_count(&self) -> u64 {
        self.stale.load(Ordering::Relaxed)
    }

    /// Drop every cached tick
    pub fn clear(&self) {
        self.quotes.write().clear();
    }

    /// Join the cached tick for `token` with its directory entry
    ///
    /// `Ok(None)` when no tick is cached for the token.
    ///
    /// # Errors
    /// `UnresolvedToken` when a tick is cached but the directory has no entry.
    pub async fn resolve(
        &self,
        store: &InstrumentStore,
        token: u32,
    ) -> Result<Option<ResolvedQuote>> {
        let Some(tick) = self.get(token) else {
            return Ok(None);
        };
        let instrument = store.resolve(token).await?;
        Ok(Some(ResolvedQuote::new(instrument, tick)))
    }
}

/// Tick joined with its instrument, prices in currency
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuote {
    /// Directory entry
    pub instrument: Instrument,
    /// Raw tick
    pub tick: Tick,
    /// Divisor applied to the tick prices
    pub scale: PriceScale,
    /// Last traded price
    pub last_price: f64,
    /// Day open
    pub open: f64,
    /// Day high
    pub high: f64,
    /// Day low
    pub low: f64,
    /// Previous close
    pub close: f64,
    /// Volume-weighted average price
    pub average_price: f64,
}

impl ResolvedQuote {
    /// Scale a tick with its instrument's segment divisor
    #[must_use]
    pub fn new(instrument: Instrument, tick: Tick) -> Self {
        let scale = instrument.price_scale();
        Self {
            last_price: scale.apply(tick.last_price),
            open: scale.apply(tick.open),
            high: scale.apply(tick.high),
            low: scale.apply(tick.low),
            close: scale.apply(tick.close),
            average_price: scale.apply(tick.average_traded_price),
            instrument,
            tick,
            scale,
        }
    }

    /// Best bid price in currency
    #[must_use]
    pub fn best_bid(&self) -> Option<f64> {
        self.tick.depth.best_bid().map(|o| self.scale.apply(o.price))
    }

    /// Best ask price in currency
    #[must_use]
    pub fn best_ask(&self) -> Option<f64> {
        self.tick.depth.best_ask().map(|o| self.scale.apply(o.price))
    }

    /// Change against previous close in currency
    #[must_use]
    pub fn change(&self) -> f64 {
        self.last_price - self.close
    }
}

/// Resolve every cached token, splitting out unknown tokens
pub async fn resolve_all(
    book: &QuoteBook,
    store: &InstrumentStore,
) -> (Vec<ResolvedQuote>, Vec<u32>) {
    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();

    for token in book.tokens() {
        match book.resolve(store, token).await {
            Ok(Some(quote)) => resolved.push(quote),
            Ok(None) => {}
            Err(FeedError::UnresolvedToken { token }) => unresolved.push(token),
            Err(e) => debug!("Skipping token {}: {}", token, e),
        }
    }

    (resolved, unresolved)
}
