//! Instrument directory management
//!
//! - `store`: token and symbol lookups over the loaded directory
//! - `master`: Kite instrument master CSV import
//! - `snapshot`: encoded directory cache on disk

pub mod master;
pub mod snapshot;
pub mod store;
