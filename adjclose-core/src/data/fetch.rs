//! Fetch orchestrator: pulls every configured ticker over a lookback window.

use super::provider::{DataError, DataProvider, FetchProgress};
use crate::domain::{FetchedPrices, TickerList, TickerSymbol};
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Trailing period requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookbackWindow {
    /// Seven calendar days; enough to span a weekend plus a holiday.
    Daily,
    /// Five years, for the wide historical export.
    Historical,
}

impl LookbackWindow {
    /// Inclusive `(start, end)` range ending on `today`.
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            LookbackWindow::Daily => today.checked_sub_days(Days::new(7)),
            LookbackWindow::Historical => today.checked_sub_months(Months::new(60)),
        };
        (start.unwrap_or(NaiveDate::MIN), today)
    }
}

/// Fetch every ticker in configured order.
///
/// A ticker whose fetch fails is logged and left out of the result; the
/// remaining tickers are still fetched.
pub fn fetch_prices(
    provider: &dyn DataProvider,
    tickers: &TickerList,
    window: LookbackWindow,
    today: NaiveDate,
    progress: &dyn FetchProgress,
) -> (FetchedPrices, FetchSummary) {
    let (start, end) = window.range(today);
    let total = tickers.len();
    let mut prices = FetchedPrices::new();
    let mut errors: Vec<(TickerSymbol, DataError)> = Vec::new();

    log::info!(
        "fetching {total} tickers from {} ({start} to {end})",
        provider.name()
    );

    for (i, ticker) in tickers.iter().enumerate() {
        progress.on_start(ticker, i, total);

        let result = provider.fetch(ticker, start, end).and_then(|fetched| {
            if fetched.symbol == *ticker {
                Ok(fetched)
            } else {
                Err(DataError::Other(format!(
                    "asked for {ticker}, provider answered for {}",
                    fetched.symbol
                )))
            }
        });
        progress.on_complete(ticker, i, total, result.as_ref().map(|f| f.series.len()));

        match result {
            Ok(fetched) => {
                log::debug!(
                    "{ticker}: {} sessions from {:?}",
                    fetched.series.len(),
                    fetched.source
                );
                prices.insert(ticker.clone(), fetched.series);
            }
            Err(e) => {
                log::warn!("fetch failed for {ticker}: {e}");
                errors.push((ticker.clone(), e));
            }
        }
    }

    let summary = FetchSummary {
        total,
        succeeded: total - errors.len(),
        failed: errors.len(),
        errors,
    };
    progress.on_batch_complete(summary.succeeded, summary.failed, total);

    (prices, summary)
}

/// Summary of a batch fetch.
#[derive(Debug)]
pub struct FetchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(TickerSymbol, DataError)>,
}

impl FetchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::{DataSource, FetchResult, SilentProgress};
    use crate::domain::{PricePoint, PriceSeries};
    use std::sync::Mutex;

    struct FakeProvider {
        missing: Vec<&'static str>,
        /// Symbols answered with another symbol's data.
        misreported: Vec<&'static str>,
        requested: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
    }

    impl DataProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        fn fetch(
            &self,
            symbol: &TickerSymbol,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<FetchResult, DataError> {
            self.requested
                .lock()
                .unwrap()
                .push((symbol.to_string(), start, end));
            if self.missing.contains(&symbol.as_str()) {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }
            let series: PriceSeries = [(
                end,
                PricePoint {
                    close: Some(10.0),
                    adj_close: Some(9.5),
                },
            )]
            .into_iter()
            .collect();
            let answered = if self.misreported.contains(&symbol.as_str()) {
                TickerSymbol::from("OTHER")
            } else {
                symbol.clone()
            };
            Ok(FetchResult {
                symbol: answered,
                series,
                source: DataSource::Fixture,
            })
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    #[test]
    fn daily_window_is_seven_days() {
        let (start, end) = LookbackWindow::Daily.range(today());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(end, today());
    }

    #[test]
    fn historical_window_is_five_years() {
        let (start, _) = LookbackWindow::Historical.range(today());
        assert_eq!(start, NaiveDate::from_ymd_opt(2019, 3, 14).unwrap());
    }

    #[test]
    fn failed_ticker_does_not_stop_the_batch() {
        let provider = FakeProvider {
            missing: vec!["XYZ"],
            misreported: vec![],
            requested: Mutex::new(Vec::new()),
        };
        let tickers = TickerList::parse_csv("SPY,XYZ,QQQ").unwrap();

        let (prices, summary) = fetch_prices(
            &provider,
            &tickers,
            LookbackWindow::Daily,
            today(),
            &SilentProgress,
        );

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.errors[0].0.as_str(), "XYZ");
        assert!(prices.contains(&"SPY".into()));
        assert!(prices.contains(&"QQQ".into()));
        assert!(!prices.contains(&"XYZ".into()));

        let requested = provider.requested.lock().unwrap();
        let order: Vec<&str> = requested.iter().map(|(s, _, _)| s.as_str()).collect();
        assert_eq!(order, vec!["SPY", "XYZ", "QQQ"]);
    }

    #[test]
    fn answer_for_another_symbol_counts_as_failure() {
        let provider = FakeProvider {
            missing: vec![],
            misreported: vec!["QQQ"],
            requested: Mutex::new(Vec::new()),
        };
        let tickers = TickerList::parse_csv("SPY,QQQ").unwrap();

        let (prices, summary) = fetch_prices(
            &provider,
            &tickers,
            LookbackWindow::Daily,
            today(),
            &SilentProgress,
        );

        assert_eq!(summary.failed, 1);
        assert!(matches!(summary.errors[0].1, DataError::Other(_)));
        assert!(prices.contains(&"SPY".into()));
        assert!(!prices.contains(&"QQQ".into()));
        assert!(!prices.contains(&"OTHER".into()));
    }
}
