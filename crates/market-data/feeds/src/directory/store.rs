//! Instrument store for token and symbol lookups
//!
//! Holds the directory as loaded plus lookup indices. A reload replaces
//! everything at once; readers never see a half-built index.

use crate::error::{FeedError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use common::{Instrument, InstrumentDirectory, InstrumentKind, OptionType};
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct Indexed {
    /// Entries in producer order
    instruments: Vec<Instrument>,

    /// Token -> position in `instruments`
    by_token: FxHashMap<u32, usize>,

    /// (exchange, trading symbol) -> position
    by_symbol: FxHashMap<(String, String), usize>,

    /// Underlying name -> positions of its derivatives
    derivatives: FxHashMap<String, Vec<usize>>,

    /// When the directory was last replaced
    loaded_at: Option<DateTime<Utc>>,
}

impl Indexed {
    fn build(directory: InstrumentDirectory) -> Self {
        let instruments = directory.instruments;
        let mut by_token = FxHashMap::with_capacity_and_hasher(instruments.len(), FxBuildHasher);
        let mut by_symbol = FxHashMap::with_capacity_and_hasher(instruments.len(), FxBuildHasher);
        let mut derivatives: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut duplicates = 0usize;

        for (pos, instrument) in instruments.iter().enumerate() {
            if by_token.insert(instrument.token, pos).is_some() {
                duplicates += 1;
                if duplicates <= 5 {
                    warn!(
                        "Duplicate token {} in directory, keeping the later entry",
                        instrument.token
                    );
                }
            }
        }

        // Secondary indices only see the entry each token resolves to
        for (pos, instrument) in instruments.iter().enumerate() {
            if by_token.get(&instrument.token) != Some(&pos) {
                continue;
            }

            by_symbol.insert(
                (instrument.exchange.clone(), instrument.trading_symbol.clone()),
                pos,
            );

            if instrument.kind().is_derivative() && !instrument.name.is_empty() {
                derivatives
                    .entry(instrument.name.clone())
                    .or_default()
                    .push(pos);
            }
        }

        if duplicates > 0 {
            warn!("Total duplicate tokens: {}", duplicates);
        }

        Self {
            instruments,
            by_token,
            by_symbol,
            derivatives,
            loaded_at: Some(Utc::now()),
        }
    }

    /// Entries reachable through `by_token`, in producer order
    fn live(&self) -> impl Iterator<Item = &Instrument> + '_ {
        self.instruments
            .iter()
            .enumerate()
            .filter(|(pos, i)| self.by_token.get(&i.token) == Some(pos))
            .map(|(_, i)| i)
    }

    fn derivatives_of<'a>(&'a self, underlying: &str) -> impl Iterator<Item = &'a Instrument> + 'a {
        self.derivatives
            .get(underlying)
            .into_iter()
            .flatten()
            .filter_map(|&pos| self.instruments.get(pos))
    }
}

/// Shared, cheaply clonable instrument store
#[derive(Debug, Clone, Default)]
pub struct InstrumentStore {
    inner: Arc<RwLock<Indexed>>,
}

impl InstrumentStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole directory
    pub async fn replace(&self, directory: InstrumentDirectory) {
        let count = directory.len();
        // Build outside the lock so lookups keep running during a reload
        let indexed = Indexed::build(directory);
        let underlyings = indexed.derivatives.len();

        {
            let mut inner = self.inner.write().await;
            *inner = indexed;
        }

        info!(
            "Loaded {} instruments ({} underlyings with derivatives)",
            count, underlyings
        );
    }

    /// Get instrument by token
    pub async fn get_by_token(&self, token: u32) -> Option<Instrument> {
        let inner = self.inner.read().await;
        inner
            .by_token
            .get(&token)
            .and_then(|&pos| inner.instruments.get(pos))
            .cloned()
    }

    /// Resolve a tick token to its instrument
    ///
    /// # Errors
    /// `UnresolvedToken` when the directory has no entry for the token.
    /// This is expected until the directory is (re)loaded.
    pub async fn resolve(&self, token: u32) -> Result<Instrument> {
        match self.get_by_token(token).await {
            Some(instrument) => Ok(instrument),
            None => {
                debug!("Token {} not in directory", token);
                Err(FeedError::UnresolvedToken { token })
            }
        }
    }

    /// Get instrument by exchange and trading symbol
    pub async fn get_by_symbol(&self, exchange: &str, trading_symbol: &str) -> Option<Instrument> {
        let inner = self.inner.read().await;
        inner
            .by_symbol
            .get(&(exchange.to_string(), trading_symbol.to_string()))
            .and_then(|&pos| inner.instruments.get(pos))
            .cloned()
    }

    /// Sorted derivative expiries for an underlying
    pub async fn expiries(&self, underlying: &str) -> Vec<NaiveDate> {
        let inner = self.inner.read().await;
        inner
            .derivatives_of(underlying)
            .filter_map(Instrument::expiry_date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted derivative expiries for an underlying, dropping those before `today`
    pub async fn expiries_from(&self, underlying: &str, today: NaiveDate) -> Vec<NaiveDate> {
        self.expiries(underlying)
            .await
            .into_iter()
            .filter(|expiry| *expiry >= today)
            .collect()
    }

    /// Option chain for an underlying and expiry, by strike then call before put
    pub async fn option_chain(&self, underlying: &str, expiry: NaiveDate) -> Vec<Instrument> {
        let inner = self.inner.read().await;
        let mut chain: Vec<Instrument> = inner
            .derivatives_of(underlying)
            .filter(|i| matches!(i.kind(), InstrumentKind::Option(_)))
            .filter(|i| i.expiry_date() == Some(expiry))
            .cloned()
            .collect();

        chain.sort_by(|a, b| {
            a.strike
                .total_cmp(&b.strike)
                .then_with(|| put_rank(a).cmp(&put_rank(b)))
        });
        chain
    }

    /// Instruments whose trading symbol, type or name contains `term`,
    /// ignoring case, in directory order and capped at `limit`
    pub async fn search(&self, term: &str, limit: usize) -> Vec<Instrument> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let inner = self.inner.read().await;
        inner
            .live()
            .filter(|i| i.matches(&needle))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Directory as loaded
    pub async fn snapshot(&self) -> InstrumentDirectory {
        let inner = self.inner.read().await;
        InstrumentDirectory::new(inner.instruments.clone())
    }

    /// Number of distinct tokens
    pub async fn count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.by_token.len()
    }

    /// When the directory was last replaced
    pub async fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.loaded_at
    }

    /// Clear all instruments
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        *inner = Indexed::default();
    }
}

fn put_rank(instrument: &Instrument) -> u8 {
    match instrument.kind() {
        InstrumentKind::Option(OptionType::Put) => 1,
        _ => 0,
    }
}
