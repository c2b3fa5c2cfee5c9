//! Market-data fetching

pub mod fetch;
pub mod provider;
pub mod yahoo;

pub use fetch::{fetch_prices, FetchSummary, LookbackWindow};
pub use provider::{
    DataError, DataProvider, DataSource, FetchProgress, FetchResult, SilentProgress,
    StdoutProgress,
};
pub use yahoo::YahooProvider;
