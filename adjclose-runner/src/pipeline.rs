//! The run pipeline: fetch → resolve → build → export → deliver.
//!
//! Each step runs once, in order, and blocks on its I/O. Per-ticker
//! failures stay inside the table as missing markers; everything else ends
//! the run with an error.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use adjclose_core::data::{fetch_prices, DataProvider, FetchProgress, LookbackWindow};
use adjclose_core::domain::OutputTable;
use adjclose_core::{build_rows, build_wide_table, resolve_prior_trading_day};

use crate::config::{RunConfig, RunMode};
use crate::delivery::{Delivery, DeliveryArtifact, DeliveryReceipt};
use crate::export::save_table;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub content_date: NaiveDate,
    pub artifact: PathBuf,
    /// Tickers requested.
    pub tickers: usize,
    /// Tickers the provider returned nothing for.
    pub failed_fetches: usize,
    /// Missing cells in a daily table; missing tickers in a historical one.
    pub missing_values: usize,
    pub receipt: DeliveryReceipt,
}

impl RunMode {
    pub fn window(self) -> LookbackWindow {
        match self {
            RunMode::Daily => LookbackWindow::Daily,
            RunMode::Historical => LookbackWindow::Historical,
        }
    }
}

/// Run one pipeline pass with `today` already fixed by the caller's policy.
pub fn run_pipeline(
    config: &RunConfig,
    provider: &dyn DataProvider,
    delivery: &dyn Delivery,
    progress: &dyn FetchProgress,
    today: NaiveDate,
) -> Result<RunOutcome> {
    config.validate()?;

    let (prices, summary) = fetch_prices(
        provider,
        &config.tickers,
        config.mode.window(),
        today,
        progress,
    );

    let index = prices.reference_index(&config.tickers);
    let prior = resolve_prior_trading_day(&index, today)?;
    log::info!("prior trading day: {prior} (today {today}, {:?} clock)", config.today_policy);

    let (table, missing_values) = match config.mode {
        RunMode::Daily => {
            let rows = build_rows(&config.tickers, &prices, prior);
            let missing = rows.iter().filter(|r| r.adjusted_close.is_missing()).count();
            (OutputTable::Long(rows), missing)
        }
        RunMode::Historical => {
            let wide = build_wide_table(&config.tickers, &prices, prior);
            let missing = config
                .tickers
                .iter()
                .filter(|t| {
                    wide.column(t)
                        .map_or(true, |col| col.iter().all(Option::is_none))
                })
                .count();
            (OutputTable::Wide(wide), missing)
        }
    };

    let path = save_table(&table, &config.output_dir, &config.file_prefix, prior)?;
    let artifact = DeliveryArtifact::new(path.clone(), prior);

    log::info!("delivering via {}", delivery.name());
    let receipt = delivery
        .deliver(&artifact)
        .with_context(|| format!("{} delivery failed", delivery.name()))?;

    Ok(RunOutcome {
        content_date: prior,
        artifact: path,
        tickers: config.tickers.len(),
        failed_fetches: summary.failed,
        missing_values,
        receipt,
    })
}
