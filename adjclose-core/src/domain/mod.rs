//! Domain types for adjusted-close exports

pub mod row;
pub mod series;
pub mod table;
pub mod ticker;

pub use row::{round_price, CloseValue, MissingReason, PriceRow, PRICE_DECIMALS};
pub use series::{FetchedPrices, PricePoint, PriceSeries};
pub use table::{OutputTable, WideTable};
pub use ticker::{TickerError, TickerList, TickerSymbol, DEFAULT_TICKERS};
