//! Adjclose Core: domain types, market-data fetching, trading-day resolution, row building.
//!
//! This crate contains everything up to the in-memory output table:
//! - Domain types (tickers, price series, rows, long and wide tables)
//! - Provider trait and the Yahoo Finance chart provider
//! - Prior trading day resolution with an explicit local/UTC "today" policy
//! - Per-ticker row building with explicit missing markers

pub mod data;
pub mod domain;
pub mod resolver;
pub mod rows;

pub use resolver::{resolve_prior_trading_day, ResolveError, TodayPolicy};
pub use rows::{build_rows, build_wide_table, lookup_close};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: core types can cross thread boundaries.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::TickerList>();
        require_sync::<domain::TickerList>();
        require_send::<domain::FetchedPrices>();
        require_sync::<domain::FetchedPrices>();
        require_send::<domain::PriceRow>();
        require_sync::<domain::PriceRow>();
        require_send::<domain::WideTable>();
        require_sync::<domain::WideTable>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
    }

    /// The provider trait is object safe; the fetcher only ever sees `&dyn DataProvider`.
    #[test]
    fn data_provider_is_object_safe() {
        fn _takes_dyn(p: &dyn data::DataProvider) -> &str {
            p.name()
        }
    }
}
