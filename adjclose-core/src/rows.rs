//! Row building for the long (daily) and wide (historical) tables.

use crate::domain::{
    round_price, CloseValue, FetchedPrices, MissingReason, PriceRow, TickerList, TickerSymbol,
    WideTable,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Look up one ticker's adjusted close on `date`.
pub fn lookup_close(
    prices: &FetchedPrices,
    ticker: &TickerSymbol,
    date: NaiveDate,
) -> CloseValue {
    let Some(series) = prices.get(ticker) else {
        return CloseValue::Missing(MissingReason::TickerAbsent);
    };
    let Some(point) = series.get(date) else {
        return CloseValue::Missing(MissingReason::DateAbsent);
    };
    match point.adj_close {
        Some(v) if v.is_finite() && v > 0.0 => CloseValue::Price(round_price(v)),
        _ => CloseValue::Missing(MissingReason::Malformed),
    }
}

/// One row per configured ticker, in configured order.
///
/// A lookup failure for one ticker yields a missing marker for that row and
/// never affects the others.
pub fn build_rows(tickers: &TickerList, prices: &FetchedPrices, date: NaiveDate) -> Vec<PriceRow> {
    tickers
        .iter()
        .map(|ticker| {
            let adjusted_close = lookup_close(prices, ticker, date);
            if let CloseValue::Missing(reason) = adjusted_close {
                log::warn!("{ticker}: no adjusted close on {date} ({reason:?})");
            }
            PriceRow {
                date,
                ticker: ticker.clone(),
                adjusted_close,
            }
        })
        .collect()
}

/// Date × ticker matrix over every fetched date up to and including `through`.
///
/// Rows are the union of all tickers' dates in ascending order; columns follow
/// the configured ticker order. Gaps stay `None`.
pub fn build_wide_table(
    tickers: &TickerList,
    prices: &FetchedPrices,
    through: NaiveDate,
) -> WideTable {
    let mut all_dates = BTreeSet::new();
    for ticker in tickers {
        if let Some(series) = prices.get(ticker) {
            all_dates.extend(series.dates().filter(|d| *d <= through));
        }
    }
    let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

    let values = dates
        .iter()
        .map(|date| {
            tickers
                .iter()
                .map(|ticker| lookup_close(prices, ticker, *date).price())
                .collect()
        })
        .collect();

    WideTable {
        tickers: tickers.as_slice().to_vec(),
        dates,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PricePoint, PriceSeries};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn series(points: &[(u32, Option<f64>)]) -> PriceSeries {
        points
            .iter()
            .map(|(day, adj)| {
                (
                    d(*day),
                    PricePoint {
                        close: adj.map(|v| v + 1.0),
                        adj_close: *adj,
                    },
                )
            })
            .collect()
    }

    fn sample() -> FetchedPrices {
        let mut prices = FetchedPrices::new();
        prices.insert("SPY".into(), series(&[(4, Some(520.123_456)), (5, Some(522.5))]));
        prices.insert("QQQ".into(), series(&[(4, Some(450.0)), (5, None)]));
        prices.insert("AGG".into(), series(&[(4, Some(97.25))]));
        prices
    }

    #[test]
    fn absent_ticker_yields_missing_row() {
        let tickers = TickerList::parse_csv("SPY,XYZ").unwrap();
        let rows = build_rows(&tickers, &sample(), d(5));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].adjusted_close, CloseValue::Price(522.5));
        assert_eq!(
            rows[1],
            PriceRow {
                date: d(5),
                ticker: TickerSymbol::from("XYZ"),
                adjusted_close: CloseValue::Missing(MissingReason::TickerAbsent),
            }
        );
    }

    #[test]
    fn each_failure_kind_is_isolated() {
        let tickers = TickerList::parse_csv("QQQ,AGG,SPY").unwrap();
        let rows = build_rows(&tickers, &sample(), d(5));

        let values: Vec<CloseValue> = rows.iter().map(|r| r.adjusted_close).collect();
        assert_eq!(
            values,
            vec![
                CloseValue::Missing(MissingReason::Malformed),
                CloseValue::Missing(MissingReason::DateAbsent),
                CloseValue::Price(522.5),
            ]
        );
    }

    #[test]
    fn prices_are_rounded() {
        let tickers = TickerList::parse_csv("SPY").unwrap();
        let rows = build_rows(&tickers, &sample(), d(4));
        assert_eq!(rows[0].adjusted_close, CloseValue::Price(520.1235));
    }

    #[test]
    fn non_positive_close_is_malformed() {
        let mut prices = FetchedPrices::new();
        prices.insert("BAD".into(), series(&[(4, Some(0.0)), (5, Some(f64::NAN))]));
        let t = TickerSymbol::from("BAD");
        assert_eq!(
            lookup_close(&prices, &t, d(4)),
            CloseValue::Missing(MissingReason::Malformed)
        );
        assert_eq!(
            lookup_close(&prices, &t, d(5)),
            CloseValue::Missing(MissingReason::Malformed)
        );
    }

    #[test]
    fn wide_table_orders_columns_and_dates() {
        let tickers = TickerList::parse_csv("AGG,SPY,XYZ").unwrap();
        let table = build_wide_table(&tickers, &sample(), d(5));

        let columns: Vec<&str> = table.tickers.iter().map(|t| t.as_str()).collect();
        assert_eq!(columns, vec!["AGG", "SPY", "XYZ"]);
        assert_eq!(table.dates, vec![d(4), d(5)]);
        assert_eq!(table.values[0], vec![Some(97.25), Some(520.1235), None]);
        assert_eq!(table.values[1], vec![None, Some(522.5), None]);
    }

    #[test]
    fn wide_table_stops_at_through_date() {
        let tickers = TickerList::parse_csv("SPY").unwrap();
        let table = build_wide_table(&tickers, &sample(), d(4));
        assert_eq!(table.dates, vec![d(4)]);
        assert_eq!(table.last_date(), Some(d(4)));
    }
}
