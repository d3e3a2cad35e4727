//! Options Engine: strategy detection and risk/reward scanning
//!
//! Scans option chains for a set of tickers and ranks the opportunities it
//! finds. Provides:
//! - Chain normalization from raw provider quotes
//! - 12 strategy detectors driven by a declarative catalog
//! - Concurrent multi-ticker scanning over an injected market-data provider
//! - Result filtering, summaries, and expiration payoff curves

pub mod chain;
pub mod config;
pub mod detectors;
pub mod error;
pub mod metrics;
pub mod payoff;
pub mod provider;
pub mod scanner;
pub mod table;
pub mod types;

// Re-exports for convenience
pub use chain::{Chain, OptionQuote, RawQuote, StrikeMap};
pub use config::{ProbabilityConfig, ScannerConfig};
pub use detectors::{ChainSides, ChainView, DetectorEntry, CATALOG};
pub use error::{DataError, DataResult, ScanError};
pub use payoff::{evaluate_payoff, evaluate_payoff_per_contract, payoff_per_share, price_grid};
pub use provider::{nearest_expiration, MarketData, StaticMarketData, TickerSnapshot};
pub use scanner::{run_detectors, Scanner};
pub use table::{ResultFilter, ResultTable, TableSummary};
pub use types::*;
