//! Per-ticker price series as returned by a provider.

use super::ticker::TickerSymbol;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One trading day for one ticker. Both the raw and the adjusted close are
/// kept; only `adj_close` feeds the exports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
}

/// Date-ordered adjusted-close history for a single ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: BTreeMap<NaiveDate, PricePoint>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, point: PricePoint) {
        self.points.insert(date, point);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&PricePoint> {
        self.points.get(&date)
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &PricePoint)> + '_ {
        self.points.iter().map(|(d, p)| (*d, p))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(NaiveDate, PricePoint)> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, PricePoint)>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Everything a fetch produced, keyed by ticker. Tickers whose fetch failed
/// are simply absent.
#[derive(Debug, Clone, Default)]
pub struct FetchedPrices {
    series: HashMap<TickerSymbol, PriceSeries>,
}

impl FetchedPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: TickerSymbol, series: PriceSeries) {
        self.series.insert(ticker, series);
    }

    pub fn get(&self, ticker: &TickerSymbol) -> Option<&PriceSeries> {
        self.series.get(ticker)
    }

    pub fn contains(&self, ticker: &TickerSymbol) -> bool {
        self.series.contains_key(ticker)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Date index used to pick the prior trading day: the index of the first
    /// ticker, in configured order, that came back from the provider.
    pub fn reference_index<'a, I>(&self, tickers: I) -> Vec<NaiveDate>
    where
        I: IntoIterator<Item = &'a TickerSymbol>,
    {
        tickers
            .into_iter()
            .find_map(|t| self.series.get(t))
            .map(|s| s.dates().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn point(v: f64) -> PricePoint {
        PricePoint {
            close: Some(v),
            adj_close: Some(v),
        }
    }

    #[test]
    fn series_dates_are_sorted() {
        let series: PriceSeries = [(d(5), point(1.0)), (d(3), point(2.0)), (d(4), point(3.0))]
            .into_iter()
            .collect();
        let dates: Vec<_> = series.dates().collect();
        assert_eq!(dates, vec![d(3), d(4), d(5)]);
    }

    #[test]
    fn reference_index_skips_absent_tickers() {
        let mut prices = FetchedPrices::new();
        prices.insert("QQQ".into(), [(d(3), point(1.0))].into_iter().collect());

        let order = [TickerSymbol::from("SPY"), TickerSymbol::from("QQQ")];
        assert_eq!(prices.reference_index(&order), vec![d(3)]);
    }

    #[test]
    fn reference_index_empty_when_nothing_fetched() {
        let prices = FetchedPrices::new();
        let order = [TickerSymbol::from("SPY")];
        assert!(prices.reference_index(&order).is_empty());
    }
}
