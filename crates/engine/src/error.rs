//! Error types for the scanner and its data layer

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Contract violations rejected at the `scan` boundary
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("min_return_pct must not be negative (got {0})")]
    NegativeMinReturn(Decimal),

    #[error("target_dte must be positive (got {0})")]
    NonPositiveTargetDte(i64),

    #[error("invalid scanner config: {0}")]
    InvalidConfig(String),
}

/// Per-ticker data problems; the scanner skips the ticker and continues
#[derive(Error, Debug)]
pub enum DataError {
    #[error("no spot price for {ticker}")]
    SpotUnavailable { ticker: String },

    #[error("no future expiration for {ticker}")]
    NoExpiration { ticker: String },

    #[error("empty option chain for {ticker} expiring {expiration}")]
    EmptyChain {
        ticker: String,
        expiration: NaiveDate,
    },

    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

pub type DataResult<T> = Result<T, DataError>;
