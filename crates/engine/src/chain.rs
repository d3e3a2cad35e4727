//! Option chain model: normalized per-strike quotes for one expiration

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{OptionSide, QuoteSnapshot};

/// A provider record before normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawQuote {
    pub strike: Decimal,
    pub side: Option<OptionSide>,
    #[serde(default)]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub ask: Option<Decimal>,
    #[serde(default)]
    pub last: Option<Decimal>,
    #[serde(default)]
    pub volume: u64,
    #[serde(default)]
    pub open_interest: u64,
    #[serde(default)]
    pub implied_volatility: Option<Decimal>,
    #[serde(default)]
    pub delta: Option<Decimal>,
    #[serde(default)]
    pub gamma: Option<Decimal>,
    #[serde(default)]
    pub theta: Option<Decimal>,
    #[serde(default)]
    pub vega: Option<Decimal>,
    #[serde(default)]
    pub contract_symbol: Option<String>,
}

impl RawQuote {
    /// Mid when both sides are quoted, else last trade, else whichever side exists
    pub fn resolved_price(&self) -> Option<Decimal> {
        let positive = |v: Option<Decimal>| v.filter(|p| *p > Decimal::ZERO);
        let bid = positive(self.bid);
        let ask = positive(self.ask);

        match (bid, ask) {
            (Some(b), Some(a)) => Some((b + a) / dec!(2)),
            _ => positive(self.last).or(ask).or(bid),
        }
    }
}

/// One strike on one side of the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: Decimal,
    pub price: Decimal,
    pub volume: u64,
    pub open_interest: u64,
    pub implied_volatility: Option<Decimal>,
    pub delta: Option<Decimal>,
    pub gamma: Option<Decimal>,
    pub theta: Option<Decimal>,
    pub vega: Option<Decimal>,
    pub contract_symbol: Option<String>,
}

impl OptionQuote {
    /// Plain quote without greeks
    pub fn new(strike: Decimal, price: Decimal) -> Self {
        Self {
            strike,
            price,
            volume: 0,
            open_interest: 0,
            implied_volatility: None,
            delta: None,
            gamma: None,
            theta: None,
            vega: None,
            contract_symbol: None,
        }
    }

    /// Implied volatility in percent; providers disagree on fraction vs percent
    pub fn iv_pct(&self) -> Option<Decimal> {
        self.implied_volatility.map(|iv| {
            if iv < dec!(10) {
                iv * dec!(100)
            } else {
                iv
            }
        })
    }

    /// Pass-through data for result records; `None` when nothing was sourced
    pub fn snapshot(&self) -> Option<QuoteSnapshot> {
        let has_data = self.volume > 0
            || self.open_interest > 0
            || self.implied_volatility.is_some()
            || self.delta.is_some()
            || self.gamma.is_some()
            || self.theta.is_some()
            || self.vega.is_some();
        if !has_data {
            return None;
        }
        Some(QuoteSnapshot {
            volume: self.volume,
            open_interest: self.open_interest,
            implied_volatility: self.iv_pct(),
            delta: self.delta,
            gamma: self.gamma,
            theta: self.theta,
            vega: self.vega,
        })
    }
}

pub type StrikeMap = BTreeMap<Decimal, OptionQuote>;

/// All usable quotes for one ticker and one expiration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    calls: StrikeMap,
    puts: StrikeMap,
}

impl Chain {
    /// Build from provider records. Records with a non-positive strike or no
    /// positive price are dropped; a repeated (strike, side) keeps the last.
    /// Returns the chain and the number of dropped records.
    pub fn from_raw(records: impl IntoIterator<Item = RawQuote>) -> (Self, usize) {
        let mut chain = Self::default();
        let mut dropped = 0usize;

        for raw in records {
            let (Some(side), Some(price)) = (raw.side, raw.resolved_price()) else {
                dropped += 1;
                continue;
            };
            if raw.strike <= Decimal::ZERO {
                dropped += 1;
                continue;
            }

            let quote = OptionQuote {
                strike: raw.strike,
                price,
                volume: raw.volume,
                open_interest: raw.open_interest,
                implied_volatility: raw.implied_volatility,
                delta: raw.delta,
                gamma: raw.gamma,
                theta: raw.theta,
                vega: raw.vega,
                contract_symbol: raw.contract_symbol,
            };
            chain.side_mut(side).insert(quote.strike, quote);
        }

        if dropped > 0 {
            debug!(dropped, "Dropped malformed quotes");
        }
        (chain, dropped)
    }

    /// Build from already-normalized quotes, applying the same validation
    pub fn from_quotes(
        calls: impl IntoIterator<Item = OptionQuote>,
        puts: impl IntoIterator<Item = OptionQuote>,
    ) -> Self {
        let valid = |q: &OptionQuote| q.strike > Decimal::ZERO && q.price > Decimal::ZERO;
        Self {
            calls: calls
                .into_iter()
                .filter(valid)
                .map(|q| (q.strike, q))
                .collect(),
            puts: puts
                .into_iter()
                .filter(valid)
                .map(|q| (q.strike, q))
                .collect(),
        }
    }

    fn side_mut(&mut self, side: OptionSide) -> &mut StrikeMap {
        match side {
            OptionSide::Call => &mut self.calls,
            OptionSide::Put => &mut self.puts,
        }
    }

    pub fn calls(&self) -> &StrikeMap {
        &self.calls
    }

    pub fn puts(&self) -> &StrikeMap {
        &self.puts
    }

    pub fn side(&self, side: OptionSide) -> &StrikeMap {
        match side {
            OptionSide::Call => &self.calls,
            OptionSide::Put => &self.puts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }

    /// Ascending strikes present on either side
    pub fn strikes_union(&self) -> Vec<Decimal> {
        let mut strikes: Vec<Decimal> = self
            .calls
            .keys()
            .chain(self.puts.keys())
            .copied()
            .collect();
        strikes.sort();
        strikes.dedup();
        strikes
    }
}
