//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over market-data sources so the pipeline
//! can run against Yahoo Finance in production and a canned provider in tests.

use crate::domain::{PriceSeries, TickerSymbol};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for a single-symbol fetch.
///
/// None of these abort a run; the fetcher logs them and leaves the ticker
/// out of the result.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from provider for {symbol}")]
    HttpStatus { symbol: String, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: TickerSymbol,
    pub series: PriceSeries,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Fixture,
}

/// Trait for market-data providers.
///
/// A fetch covers `start..=end` at daily sampling and must keep both the raw
/// and the adjusted close for each date.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the daily series for a symbol over a date range.
    fn fetch(
        &self,
        symbol: &TickerSymbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}

/// Progress callback for multi-symbol fetches.
pub trait FetchProgress {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &TickerSymbol, index: usize, total: usize);

    /// Called when a symbol fetch completes.
    fn on_complete(
        &self,
        symbol: &TickerSymbol,
        index: usize,
        total: usize,
        result: Result<usize, &DataError>,
    );

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, symbol: &TickerSymbol, index: usize, total: usize) {
        println!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &TickerSymbol,
        _index: usize,
        _total: usize,
        result: Result<usize, &DataError>,
    ) {
        match result {
            Ok(days) => println!("  OK: {symbol} ({days} days)"),
            Err(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nFetch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Progress reporter that prints nothing.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_start(&self, _symbol: &TickerSymbol, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        _symbol: &TickerSymbol,
        _index: usize,
        _total: usize,
        _result: Result<usize, &DataError>,
    ) {
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}
