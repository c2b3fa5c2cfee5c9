//! Output tables: long form for daily runs, wide form for history pulls.

use super::row::PriceRow;
use super::ticker::TickerSymbol;
use chrono::NaiveDate;

/// Date × ticker matrix. `values[i][j]` is the adjusted close of
/// `tickers[j]` on `dates[i]`; `None` for gaps and non-trading days.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub tickers: Vec<TickerSymbol>,
    /// Ascending.
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl WideTable {
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn column(&self, ticker: &TickerSymbol) -> Option<Vec<Option<f64>>> {
        let j = self.tickers.iter().position(|t| t == ticker)?;
        Some(self.values.iter().map(|row| row[j]).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputTable {
    Long(Vec<PriceRow>),
    Wide(WideTable),
}
