//! Instrument reference data
//!
//! A directory is a flat, ordered list of instruments keyed by their
//! exchange token. It is replaced wholesale on every refresh.

use crate::scale::PriceScale;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Option type for derivatives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option
    Call,
    /// Put option
    Put,
}

/// Instrument classification derived from the `instrument_type` and
/// `segment` strings of the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentKind {
    /// Equity/Stock instrument
    Equity,
    /// Index instrument (not tradable)
    Index,
    /// Future contract
    Future,
    /// Option contract
    Option(OptionType),
    /// Anything the directory labels in a way we do not classify
    Other,
}

impl InstrumentKind {
    /// Whether the instrument is a future or an option
    #[must_use]
    pub const fn is_derivative(self) -> bool {
        matches!(self, Self::Future | Self::Option(_))
    }
}

/// One directory entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Exchange-assigned token, unique within a trading day
    pub token: u32,

    /// Trading symbol (e.g., "NIFTY24DEC24000CE")
    pub trading_symbol: String,

    /// Exchange (e.g., "NSE", "NFO")
    pub exchange: String,

    /// Display name; the underlying for derivatives
    pub name: String,

    /// Expiry as sent by the producer, empty for non-derivatives
    pub expiry: String,

    /// Strike price, zero for non-options
    pub strike: f64,

    /// Minimum price movement, zero when not price-stepped
    pub tick_size: f64,

    /// Minimum tradable quantity
    pub lot_size: u32,

    /// Raw instrument type ("EQ", "FUT", "CE", "PE", ...)
    pub instrument_type: String,

    /// Exchange segment (e.g., "NSE", "NFO-OPT", "CDS-FUT", "INDICES")
    pub segment: String,
}

impl Instrument {
    /// Classify the instrument
    #[must_use]
    pub fn kind(&self) -> InstrumentKind {
        if self.segment == "INDICES" {
            return InstrumentKind::Index;
        }

        match self.instrument_type.as_str() {
            "EQ" => InstrumentKind::Equity,
            "FUT" => InstrumentKind::Future,
            "CE" => InstrumentKind::Option(OptionType::Call),
            "PE" => InstrumentKind::Option(OptionType::Put),
            _ => InstrumentKind::Other,
        }
    }

    /// Expiry parsed as a calendar date (`%Y-%m-%d`)
    #[must_use]
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        if self.expiry.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(&self.expiry, "%Y-%m-%d").ok()
    }

    /// Divisor turning this instrument's integer tick prices into currency
    #[must_use]
    pub fn price_scale(&self) -> PriceScale {
        PriceScale::for_segment(&self.segment)
    }

    /// Whether an option is in the money against the underlying's last price
    ///
    /// Calls are in the money below the underlying, puts above it. Anything
    /// that is not an option is never in the money.
    #[must_use]
    pub fn is_itm(&self, underlying_price: f64) -> bool {
        match self.kind() {
            InstrumentKind::Option(OptionType::Call) => self.strike < underlying_price,
            InstrumentKind::Option(OptionType::Put) => self.strike > underlying_price,
            _ => false,
        }
    }

    /// Case-insensitive substring match on trading symbol, type and name
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        [&self.trading_symbol, &self.instrument_type, &self.name]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Full instrument reference-data snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentDirectory {
    /// Entries in producer order
    pub instruments: Vec<Instrument>,
}

impl InstrumentDirectory {
    /// Create a directory from entries
    #[must_use]
    pub const fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Whether the directory has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Iterate entries in order
    pub fn iter(&self) -> std::slice::Iter<'_, Instrument> {
        self.instruments.iter()
    }
}

impl From<Vec<Instrument>> for InstrumentDirectory {
    fn from(instruments: Vec<Instrument>) -> Self {
        Self::new(instruments)
    }
}

impl FromIterator<Instrument> for InstrumentDirectory {
    fn from_iter<I: IntoIterator<Item = Instrument>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for InstrumentDirectory {
    type Item = Instrument;
    type IntoIter = std::vec::IntoIter<Instrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.into_iter()
    }
}

impl<'a> IntoIterator for &'a InstrumentDirectory {
    type Item = &'a Instrument;
    type IntoIter = std::slice::Iter<'a, Instrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn instrument(instrument_type: &str, segment: &str) -> Instrument {
        Instrument {
            token: 1,
            instrument_type: instrument_type.to_string(),
            segment: segment.to_string(),
            ..Instrument::default()
        }
    }

    #[rstest]
    #[case("EQ", "NSE", InstrumentKind::Equity)]
    #[case("FUT", "NFO-FUT", InstrumentKind::Future)]
    #[case("CE", "NFO-OPT", InstrumentKind::Option(OptionType::Call))]
    #[case("PE", "NFO-OPT", InstrumentKind::Option(OptionType::Put))]
    #[case("EQ", "INDICES", InstrumentKind::Index)]
    #[case("", "NSE", InstrumentKind::Other)]
    fn test_kind(
        #[case] instrument_type: &str,
        #[case] segment: &str,
        #[case] expected: InstrumentKind,
    ) {
        assert_eq!(instrument(instrument_type, segment).kind(), expected);
    }

    #[test]
    fn test_expiry_date() {
        let mut inst = instrument("FUT", "NFO-FUT");
        assert_eq!(inst.expiry_date(), None);

        inst.expiry = "2024-12-26".to_string();
        assert_eq!(inst.expiry_date(), NaiveDate::from_ymd_opt(2024, 12, 26));

        inst.expiry = "26DEC24".to_string();
        assert_eq!(inst.expiry_date(), None);
    }

    #[rstest]
    #[case("CE", 24_000.0, 24_150.5, true)]
    #[case("CE", 24_200.0, 24_150.5, false)]
    #[case("PE", 24_200.0, 24_150.5, true)]
    #[case("PE", 24_000.0, 24_150.5, false)]
    #[case("CE", 24_000.0, 24_000.0, false)]
    #[case("FUT", 0.0, 24_150.5, false)]
    fn test_is_itm(
        #[case] instrument_type: &str,
        #[case] strike: f64,
        #[case] underlying: f64,
        #[case] itm: bool,
    ) {
        let option = Instrument {
            strike,
            ..instrument(instrument_type, "NFO-OPT")
        };
        assert_eq!(option.is_itm(underlying), itm);
    }

    #[test]
    fn test_matches_ignores_case() {
        let inst = Instrument {
            trading_symbol: "NIFTY24DEC24000CE".to_string(),
            name: "NIFTY".to_string(),
            ..instrument("CE", "NFO-OPT")
        };
        assert!(inst.matches("24dec"));
        assert!(inst.matches("ce"));
        assert!(inst.matches("nifty"));
        assert!(!inst.matches("banknifty"));
    }

    #[test]
    fn test_derivative_flag() {
        assert!(InstrumentKind::Future.is_derivative());
        assert!(InstrumentKind::Option(OptionType::Put).is_derivative());
        assert!(!InstrumentKind::Equity.is_derivative());
        assert!(!InstrumentKind::Index.is_derivative());
    }

    #[test]
    fn test_directory_collects_in_order() {
        let directory: InstrumentDirectory = (1..=3)
            .map(|token| Instrument {
                token,
                ..Instrument::default()
            })
            .collect();

        assert_eq!(directory.len(), 3);
        let tokens: Vec<u32> = directory.iter().map(|i| i.token).collect();
        assert_eq!(tokens, vec![1, 2, 3]);
    }
}
