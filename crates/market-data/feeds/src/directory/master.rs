//! Kite instrument master import
//!
//! The master is a CSV dump with the header
//! `instrument_token,exchange_token,tradingsymbol,name,last_price,expiry,strike,tick_size,lot_size,instrument_type,segment,exchange`.
//! Columns not needed for the directory are ignored.

use crate::error::Result;
use common::{Instrument, InstrumentDirectory};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of a master import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterImport {
    /// Parsed entries in file order
    pub directory: InstrumentDirectory,
    /// Rows that could not be parsed
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct MasterRow {
    instrument_token: u32,
    tradingsymbol: String,
    name: Option<String>,
    expiry: Option<String>,
    strike: Option<f64>,
    tick_size: Option<f64>,
    lot_size: Option<u32>,
    instrument_type: String,
    segment: String,
    exchange: String,
}

impl From<MasterRow> for Instrument {
    fn from(row: MasterRow) -> Self {
        Self {
            token: row.instrument_token,
            trading_symbol: row.tradingsymbol,
            exchange: row.exchange,
            name: row.name.unwrap_or_default(),
            expiry: row.expiry.unwrap_or_default(),
            strike: row.strike.unwrap_or_default(),
            tick_size: row.tick_size.unwrap_or_default(),
            lot_size: row.lot_size.unwrap_or_default(),
            instrument_type: row.instrument_type,
            segment: row.segment,
        }
    }
}

/// Parse an instrument master from any reader
///
/// Rows that fail to parse are skipped and counted.
///
/// # Errors
/// `Csv` when the header row itself cannot be read.
pub fn parse_master_csv<R: Read>(reader: R) -> Result<MasterImport> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    debug!("Master header: {:?}", headers);

    let mut instruments = Vec::new();
    let mut skipped = 0usize;

    for result in reader.deserialize::<MasterRow>() {
        match result {
            Ok(row) => {
                if instruments.len() < 5 {
                    debug!("Parsed instrument: {}", row.tradingsymbol);
                }
                instruments.push(Instrument::from(row));
            }
            Err(e) => {
                skipped += 1;
                if skipped <= 5 {
                    warn!("Failed to parse instrument: {}", e);
                }
            }
        }
    }

    if skipped > 0 {
        warn!("Total parse errors: {}", skipped);
    }
    info!("Parsed {} instruments from master", instruments.len());

    Ok(MasterImport {
        directory: InstrumentDirectory::new(instruments),
        skipped,
    })
}

/// Parse an instrument master file
///
/// # Errors
/// `Io` when the file cannot be opened, otherwise as [`parse_master_csv`].
pub fn load_master_csv(path: &Path) -> Result<MasterImport> {
    info!("Reading instrument master from {}", path.display());
    let file = File::open(path)?;
    parse_master_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "instrument_token,exchange_token,tradingsymbol,name,last_price,expiry,strike,tick_size,lot_size,instrument_type,segment,exchange\n";

    #[test]
    fn test_parse_rows() -> Result<()> {
        let csv = format!(
            "{HEADER}\
             408065,1594,INFY,INFOSYS,0,,0,0.05,1,EQ,NSE,NSE\n\
             12345602,48225,NIFTY24DEC24000CE,NIFTY,0,2024-12-26,24000,0.05,25,CE,NFO-OPT,NFO\n"
        );

        let import = parse_master_csv(csv.as_bytes())?;
        assert_eq!(import.skipped, 0);
        assert_eq!(import.directory.len(), 2);

        let infy = &import.directory.instruments[0];
        assert_eq!(infy.token, 408_065);
        assert_eq!(infy.trading_symbol, "INFY");
        assert_eq!(infy.name, "INFOSYS");
        assert_eq!(infy.expiry, "");
        assert_eq!(infy.lot_size, 1);

        let call = &import.directory.instruments[1];
        assert_eq!(call.expiry, "2024-12-26");
        assert_eq!(call.strike, 24_000.0);
        assert_eq!(call.segment, "NFO-OPT");
        assert_eq!(call.exchange, "NFO");
        Ok(())
    }

    #[test]
    fn test_bad_rows_are_skipped() -> Result<()> {
        let csv = format!(
            "{HEADER}\
             not-a-token,1,BAD,,0,,0,0.05,1,EQ,NSE,NSE\n\
             408065,1594,INFY,INFOSYS,0,,0,0.05,1,EQ,NSE,NSE\n"
        );

        let import = parse_master_csv(csv.as_bytes())?;
        assert_eq!(import.skipped, 1);
        assert_eq!(import.directory.len(), 1);
        assert_eq!(import.directory.instruments[0].token, 408_065);
        Ok(())
    }

    #[test]
    fn test_empty_master() -> Result<()> {
        let import = parse_master_csv(HEADER.as_bytes())?;
        assert!(import.directory.is_empty());
        assert_eq!(import.skipped, 0);
        Ok(())
    }
}
