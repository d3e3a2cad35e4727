//! Ranked scan output and the queries callers run over it

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::metrics::round_pct;
use crate::types::{StrategyKind, StrategyResult};

// ---------------------------------------------------------------------------
// ResultTable
// ---------------------------------------------------------------------------

/// Results ordered by `return_pct` descending. Equal returns keep the order
/// they were produced in (ticker order, then detector order).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    results: Vec<StrategyResult>,
}

impl ResultTable {
    pub fn from_results(mut results: Vec<StrategyResult>) -> Self {
        // stable
        results.sort_by(|a, b| b.return_pct.cmp(&a.return_pct));
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StrategyResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[StrategyResult] {
        &self.results
    }

    pub fn into_vec(self) -> Vec<StrategyResult> {
        self.results
    }

    /// Best `n` results
    pub fn top(&self, n: usize) -> &[StrategyResult] {
        &self.results[..n.min(self.results.len())]
    }

    /// Matching rows, ranking preserved
    pub fn filter(&self, filter: &ResultFilter) -> ResultTable {
        ResultTable {
            results: self
                .results
                .iter()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect(),
        }
    }

    pub fn summary(&self) -> TableSummary {
        let mut by_strategy: BTreeMap<String, usize> = BTreeMap::new();
        let mut best_by_ticker: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut total = Decimal::ZERO;

        for r in &self.results {
            *by_strategy.entry(r.display_name().to_string()).or_default() += 1;
            best_by_ticker
                .entry(r.ticker.clone())
                .and_modify(|best| *best = (*best).max(r.return_pct))
                .or_insert(r.return_pct);
            total += r.return_pct;
        }

        let mean_return_pct = if self.results.is_empty() {
            None
        } else {
            Some(round_pct(total / Decimal::from(self.results.len())))
        };

        TableSummary {
            total: self.results.len(),
            mean_return_pct,
            best_return_pct: self.results.first().map(|r| r.return_pct),
            by_strategy,
            best_by_ticker,
        }
    }
}

impl IntoIterator for ResultTable {
    type Item = StrategyResult;
    type IntoIter = std::vec::IntoIter<StrategyResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a StrategyResult;
    type IntoIter = std::slice::Iter<'a, StrategyResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Row criteria; unset or empty fields match everything
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultFilter {
    pub min_return_pct: Option<Decimal>,
    pub max_dte: Option<u32>,
    pub strategies: Vec<StrategyKind>,
    pub tickers: Vec<String>,
}

impl ResultFilter {
    pub fn matches(&self, result: &StrategyResult) -> bool {
        if self.min_return_pct.is_some_and(|min| result.return_pct < min) {
            return false;
        }
        if self.max_dte.is_some_and(|max| result.dte > max) {
            return false;
        }
        if !self.strategies.is_empty() && !self.strategies.contains(&result.strategy) {
            return false;
        }
        if !self.tickers.is_empty() && !self.tickers.iter().any(|t| t == &result.ticker) {
            return false;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub total: usize,
    pub mean_return_pct: Option<Decimal>,
    pub best_return_pct: Option<Decimal>,
    /// Keyed by display name, so put and call credit spreads count apart
    pub by_strategy: BTreeMap<String, usize>,
    pub best_by_ticker: BTreeMap<String, Decimal>,
}
