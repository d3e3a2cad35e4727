//! In-memory market data, built in code or loaded from a JSON snapshot

use std::collections::{BTreeMap, HashMap};

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{nearest_expiration, MarketData};
use crate::chain::{Chain, RawQuote};
use crate::error::{DataError, DataResult};

/// Everything known about one ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerSnapshot {
    pub spot: Option<Decimal>,
    pub expirations: Vec<NaiveDate>,
    pub chains: BTreeMap<NaiveDate, Vec<RawQuote>>,
}

/// Fixed market data as of `today`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticMarketData {
    pub today: NaiveDate,
    #[serde(default)]
    pub tickers: HashMap<String, TickerSnapshot>,
}

impl StaticMarketData {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            tickers: HashMap::new(),
        }
    }

    /// Parse a snapshot like `{"today": "2026-10-19", "tickers": {"SPY": {...}}}`.
    /// A ticker's expirations are its `expirations` list plus its `chains` keys.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let data: Self = serde_json::from_str(json).context("invalid market data snapshot")?;
        debug!(tickers = data.tickers.len(), today = %data.today, "Loaded market data snapshot");
        Ok(data)
    }

    pub fn with_spot(mut self, ticker: &str, price: Decimal) -> Self {
        self.entry(ticker).spot = Some(price);
        self
    }

    /// Listed expirations, whether or not a chain is registered for them
    pub fn with_expirations(
        mut self,
        ticker: &str,
        dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        let entry = self.entry(ticker);
        for date in dates {
            if !entry.expirations.contains(&date) {
                entry.expirations.push(date);
            }
        }
        self
    }

    /// Register a raw chain; the expiration is listed as well
    pub fn with_chain(
        mut self,
        ticker: &str,
        expiration: NaiveDate,
        records: impl IntoIterator<Item = RawQuote>,
    ) -> Self {
        let entry = self.entry(ticker);
        if !entry.expirations.contains(&expiration) {
            entry.expirations.push(expiration);
        }
        entry.chains.insert(expiration, records.into_iter().collect());
        self
    }

    fn entry(&mut self, ticker: &str) -> &mut TickerSnapshot {
        self.tickers.entry(ticker.to_string()).or_default()
    }
}

#[async_trait]
impl MarketData for StaticMarketData {
    async fn spot_price(&self, ticker: &str) -> DataResult<Decimal> {
        self.tickers
            .get(ticker)
            .and_then(|t| t.spot)
            .ok_or_else(|| DataError::SpotUnavailable {
                ticker: ticker.to_string(),
            })
    }

    async fn target_expiration(
        &self,
        ticker: &str,
        target_dte: u32,
    ) -> DataResult<(NaiveDate, u32)> {
        self.tickers
            .get(ticker)
            .and_then(|t| {
                let listed: Vec<NaiveDate> = t
                    .expirations
                    .iter()
                    .chain(t.chains.keys())
                    .copied()
                    .collect();
                nearest_expiration(&listed, self.today, target_dte)
            })
            .ok_or_else(|| DataError::NoExpiration {
                ticker: ticker.to_string(),
            })
    }

    async fn chain(&self, ticker: &str, expiration: NaiveDate) -> DataResult<Chain> {
        let records = self
            .tickers
            .get(ticker)
            .and_then(|t| t.chains.get(&expiration))
            .cloned()
            .unwrap_or_default();
        let (chain, dropped) = Chain::from_raw(records);
        if dropped > 0 {
            debug!(ticker = %ticker, %expiration, dropped, "Snapshot chain had malformed quotes");
        }
        Ok(chain)
    }
}
