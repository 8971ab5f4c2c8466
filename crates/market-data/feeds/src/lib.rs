//! Consumer side of the Kite market-data feed
//!
//! Organized structure:
//! - directory/: instrument store, master CSV import, snapshot cache
//! - quotes: latest tick per instrument token
//! - config: directory cache and refresh settings

#![deny(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod directory;
pub mod error;
pub mod quotes;

pub use config::DirectoryConfig;
pub use directory::master::{MasterImport, load_master_csv, parse_master_csv};
pub use directory::snapshot::{SnapshotCache, SnapshotMetadata};
pub use directory::store::InstrumentStore;
pub use error::{FeedError, Result};
pub use quotes::{QuoteBook, ResolvedQuote, resolve_all};
