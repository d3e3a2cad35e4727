//! External market-data capability consumed by the scanner
//!
//! Concrete vendors are adapters behind [`MarketData`]; the detectors never
//! see them. [`StaticMarketData`] is the in-memory adapter.

mod snapshot;

pub use snapshot::{StaticMarketData, TickerSnapshot};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::chain::Chain;
use crate::error::DataResult;

/// Per-ticker market data. Retries and caching belong to the adapter.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Current underlying price
    async fn spot_price(&self, ticker: &str) -> DataResult<Decimal>;

    /// Expiration nearest to `target_dte` among future dates, with its actual DTE
    async fn target_expiration(&self, ticker: &str, target_dte: u32)
        -> DataResult<(NaiveDate, u32)>;

    /// Normalized chain for one expiration
    async fn chain(&self, ticker: &str, expiration: NaiveDate) -> DataResult<Chain>;
}

/// Pick the expiration whose DTE is closest to `target_dte`. Only dates after
/// `today` count; ties go to the earlier date.
pub fn nearest_expiration(
    expirations: &[NaiveDate],
    today: NaiveDate,
    target_dte: u32,
) -> Option<(NaiveDate, u32)> {
    expirations
        .iter()
        .filter_map(|&date| {
            let dte = u32::try_from((date - today).num_days()).ok()?;
            (dte > 0).then_some((date, dte))
        })
        .min_by_key(|&(date, dte)| (dte.abs_diff(target_dte), date))
}
