//! Prior trading day resolution.
//!
//! The provider's date index for the trailing window contains completed
//! sessions and, during market hours, the session in progress. The prior
//! trading day is the latest date strictly before today.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which wall clock defines "today".
///
/// Near midnight the two clocks disagree on the date, which changes the
/// resolved day. A run picks one policy and uses it throughout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodayPolicy {
    #[default]
    Local,
    Utc,
}

impl TodayPolicy {
    pub fn today(self) -> NaiveDate {
        match self {
            TodayPolicy::Local => chrono::Local::now().date_naive(),
            TodayPolicy::Utc => chrono::Utc::now().date_naive(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no trading day before {today} in the fetched window (provider outage, empty series or clock skew)")]
    EmptyWindow { today: NaiveDate },
}

/// Latest date in `index` strictly before `today`.
///
/// The index does not need to be sorted.
pub fn resolve_prior_trading_day(
    index: &[NaiveDate],
    today: NaiveDate,
) -> Result<NaiveDate, ResolveError> {
    index
        .iter()
        .copied()
        .filter(|d| *d < today)
        .max()
        .ok_or(ResolveError::EmptyWindow { today })
}
