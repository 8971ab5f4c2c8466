//! Integer price scaling
//!
//! Tick prices travel as unsigned integers. The divisor that turns them
//! into currency depends on the instrument's segment and is not on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Divisor applied to integer tick prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct PriceScale(u32);

impl PriceScale {
    /// Equity, F&O and commodity prices are sent in paise
    pub const PAISE: Self = Self(100);

    /// BSE currency derivatives
    pub const BCD: Self = Self(10_000);

    /// NSE currency derivatives
    pub const CDS: Self = Self(10_000_000);

    /// Create a scale from a raw divisor; zero is clamped to one
    #[must_use]
    pub const fn new(divisor: u32) -> Self {
        if divisor == 0 { Self(1) } else { Self(divisor) }
    }

    /// Pick the divisor for an exchange segment
    #[must_use]
    pub fn for_segment(segment: &str) -> Self {
        if segment.starts_with("CDS") {
            Self::CDS
        } else if segment.starts_with("BCD") {
            Self::BCD
        } else {
            Self::PAISE
        }
    }

    /// Raw divisor
    #[must_use]
    pub const fn divisor(&self) -> u32 {
        self.0
    }

    /// Convert an integer wire price to currency
    #[must_use]
    pub fn apply(&self, raw: u32) -> f64 {
        f64::from(raw) / f64::from(self.0)
    }
}

impl Default for PriceScale {
    fn default() -> Self {
        Self::PAISE
    }
}

impl From<u32> for PriceScale {
    fn from(divisor: u32) -> Self {
        Self::new(divisor)
    }
}

impl From<PriceScale> for u32 {
    fn from(scale: PriceScale) -> Self {
        scale.0
    }
}

impl fmt::Display for PriceScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1/{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("NSE", 100)]
    #[case("NFO-OPT", 100)]
    #[case("MCX-FUT", 100)]
    #[case("CDS-FUT", 10_000_000)]
    #[case("CDS-OPT", 10_000_000)]
    #[case("BCD-FUT", 10_000)]
    #[case("", 100)]
    fn test_for_segment(#[case] segment: &str, #[case] divisor: u32) {
        assert_eq!(PriceScale::for_segment(segment).divisor(), divisor);
    }

    #[test]
    fn test_apply() {
        assert!((PriceScale::PAISE.apply(245_065) - 2450.65).abs() < 1e-9);
        assert!((PriceScale::CDS.apply(832_512_500) - 83.25125).abs() < 1e-9);
        assert_eq!(PriceScale::PAISE.apply(0), 0.0);
    }

    #[test]
    fn test_zero_divisor_clamped() {
        assert_eq!(PriceScale::new(0).divisor(), 1);
        assert_eq!(PriceScale::new(0).apply(42), 42.0);
    }

    #[test]
    fn test_deserialize_clamps_zero() -> Result<(), serde_json::Error> {
        let scale: PriceScale = serde_json::from_str("0")?;
        assert_eq!(scale.divisor(), 1);
        assert!(scale.apply(42).is_finite());

        assert_eq!(serde_json::to_string(&PriceScale::CDS)?, "10000000");
        let scale: PriceScale = serde_json::from_str("10000")?;
        assert_eq!(scale, PriceScale::BCD);
        Ok(())
    }
}
