//! PriceRow: one ticker's adjusted close on the resolved date.

use super::ticker::TickerSymbol;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Decimal places kept for exported prices.
pub const PRICE_DECIMALS: usize = 4;

/// Round a price to [`PRICE_DECIMALS`] places.
///
/// Rounds once from the exact binary value, so `190.95585` (stored as
/// `190.955849999...`) becomes `190.9558`. Scaling by `10^4` first would
/// round twice and push such values up.
pub fn round_price(value: f64) -> f64 {
    format!("{:.*}", PRICE_DECIMALS, value)
        .parse()
        .unwrap_or(value)
}

/// Why a row carries no price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingReason {
    /// The provider returned nothing for this ticker.
    TickerAbsent,
    /// The ticker has a series but no entry on the resolved date.
    DateAbsent,
    /// The entry exists but the adjusted close is null, non-finite or not positive.
    Malformed,
}

/// Either a rounded adjusted close or an explicit missing marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CloseValue {
    Price(f64),
    Missing(MissingReason),
}

impl CloseValue {
    pub fn price(&self) -> Option<f64> {
        match self {
            CloseValue::Price(p) => Some(*p),
            CloseValue::Missing(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CloseValue::Missing(_))
    }
}

/// Atomic unit of the daily export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub ticker: TickerSymbol,
    pub adjusted_close: CloseValue,
}
