//! Scan orchestration
//!
//! For each ticker: spot price → expiration nearest the target DTE → chain →
//! every detector in catalog order. A ticker whose data is missing is logged
//! and skipped; the rest of the scan carries on. Tickers are resolved
//! concurrently but merged in input order, then ranked by return.

use futures_util::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::chain::Chain;
use crate::config::ScannerConfig;
use crate::detectors::CATALOG;
use crate::error::{DataError, DataResult, ScanError};
use crate::provider::MarketData;
use crate::table::ResultTable;
use crate::types::{ScanContext, StrategyResult};

pub struct Scanner<P> {
    provider: P,
    config: ScannerConfig,
}

impl<P: MarketData> Scanner<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ScannerConfig::default())
    }

    pub fn with_config(provider: P, config: ScannerConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Scan every ticker and return one ranked table.
    ///
    /// Only bad parameters are errors; per-ticker data problems just leave
    /// that ticker out of the table.
    pub async fn scan<S: AsRef<str>>(
        &self,
        tickers: &[S],
        target_dte: i64,
        min_return_pct: Decimal,
    ) -> Result<ResultTable, ScanError> {
        if min_return_pct < Decimal::ZERO {
            return Err(ScanError::NegativeMinReturn(min_return_pct));
        }
        if target_dte <= 0 {
            return Err(ScanError::NonPositiveTargetDte(target_dte));
        }
        self.config.validate()?;
        let target_dte = u32::try_from(target_dte).unwrap_or(u32::MAX);

        info!(
            tickers = tickers.len(),
            target_dte,
            min_return = %min_return_pct,
            "Starting options scan"
        );

        let per_ticker: Vec<Vec<StrategyResult>> = stream::iter(tickers)
            .map(|ticker| self.scan_or_skip(ticker.as_ref(), target_dte, min_return_pct))
            .buffered(self.config.max_concurrent_tickers)
            .collect()
            .await;

        let table = ResultTable::from_results(per_ticker.into_iter().flatten().collect());
        info!(results = table.len(), "Scan complete");
        Ok(table)
    }

    async fn scan_or_skip(
        &self,
        ticker: &str,
        target_dte: u32,
        min_return_pct: Decimal,
    ) -> Vec<StrategyResult> {
        match self.scan_ticker(ticker, target_dte, min_return_pct).await {
            Ok(results) => results,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Skipping ticker");
                Vec::new()
            }
        }
    }

    /// Resolve one ticker's inputs and run the catalog over them. Results
    /// come back in detector order, unsorted.
    pub async fn scan_ticker(
        &self,
        ticker: &str,
        target_dte: u32,
        min_return_pct: Decimal,
    ) -> DataResult<Vec<StrategyResult>> {
        let spot_price = self.provider.spot_price(ticker).await?;
        if spot_price <= Decimal::ZERO {
            return Err(DataError::SpotUnavailable {
                ticker: ticker.to_string(),
            });
        }

        let (expiration, dte) = self.provider.target_expiration(ticker, target_dte).await?;
        if dte == 0 {
            return Err(DataError::NoExpiration {
                ticker: ticker.to_string(),
            });
        }

        let chain = self.provider.chain(ticker, expiration).await?;
        if chain.is_empty() {
            return Err(DataError::EmptyChain {
                ticker: ticker.to_string(),
                expiration,
            });
        }

        let ctx = ScanContext {
            ticker: ticker.to_string(),
            spot_price,
            expiration,
            days_to_expiration: dte,
            min_return_pct,
        };
        let results = run_detectors(&ctx, &chain, &self.config);

        info!(
            ticker = %ticker,
            spot = %spot_price,
            expiration = %expiration,
            dte,
            calls = chain.calls().len(),
            puts = chain.puts().len(),
            results = results.len(),
            "Scanned ticker"
        );
        Ok(results)
    }
}

/// Every detector over one chain, concatenated in catalog order
pub fn run_detectors(ctx: &ScanContext, chain: &Chain, config: &ScannerConfig) -> Vec<StrategyResult> {
    let mut results = Vec::new();
    for entry in CATALOG.iter() {
        let found = entry.run(ctx, chain, config);
        debug!(
            ticker = %ctx.ticker,
            strategy = %entry.strategy,
            count = found.len(),
            "Detector finished"
        );
        results.extend(found);
    }
    results
}
