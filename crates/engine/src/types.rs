//! Types for the strategy scanner

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of an option contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    /// Parse provider spellings ("call", "C", "put", "P", ...)
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        if lower == "c" || lower.contains("call") {
            Some(Self::Call)
        } else if lower == "p" || lower.contains("put") {
            Some(Self::Put)
        } else {
            None
        }
    }
}

/// The 12 strategy shapes the scanner knows how to detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    LongCall,
    LongPut,
    ShortCall,
    ShortPut,
    BullCallSpread,
    BearPutSpread,
    CashSecuredPut,
    CoveredCall,
    LongStraddle,
    LongStrangle,
    IronCondor,
    CreditSpread,
}

impl StrategyKind {
    pub fn all() -> &'static [StrategyKind] {
        &[
            Self::LongCall,
            Self::LongPut,
            Self::ShortCall,
            Self::ShortPut,
            Self::BullCallSpread,
            Self::BearPutSpread,
            Self::CashSecuredPut,
            Self::CoveredCall,
            Self::LongStraddle,
            Self::LongStrangle,
            Self::IronCondor,
            Self::CreditSpread,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LongCall => "Long Call",
            Self::LongPut => "Long Put",
            Self::ShortCall => "Short Call (Naked)",
            Self::ShortPut => "Short Put (Naked)",
            Self::BullCallSpread => "Bull Call Spread",
            Self::BearPutSpread => "Bear Put Spread",
            Self::CashSecuredPut => "Cash-Secured Put",
            Self::CoveredCall => "Covered Call",
            Self::LongStraddle => "Long Straddle",
            Self::LongStrangle => "Long Strangle",
            Self::IronCondor => "Iron Condor",
            Self::CreditSpread => "Credit Spread",
        }
    }

    /// Straddles and strangles rank by required move, not by a return
    pub fn is_return_gated(&self) -> bool {
        !matches!(self, Self::LongStraddle | Self::LongStrangle)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable per-ticker scan inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanContext {
    pub ticker: String,
    pub spot_price: Decimal,
    pub expiration: NaiveDate,
    pub days_to_expiration: u32,
    pub min_return_pct: Decimal,
}

/// Volume, open interest and greeks carried over from the originating quote
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub volume: u64,
    pub open_interest: u64,
    pub implied_volatility: Option<Decimal>,
    pub delta: Option<Decimal>,
    pub gamma: Option<Decimal>,
    pub theta: Option<Decimal>,
    pub vega: Option<Decimal>,
}

/// Breakeven price(s) at expiration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Breakeven {
    Single { price: Decimal },
    Range { lower: Decimal, upper: Decimal },
}

impl Breakeven {
    pub fn single(price: Decimal) -> Self {
        Self::Single { price }
    }

    pub fn range(lower: Decimal, upper: Decimal) -> Self {
        Self::Range { lower, upper }
    }
}

/// Strategy-specific legs and figures
///
/// Money fields are per share; `margin_required` and `collateral` are per
/// contract, as brokers quote them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Position {
    LongOption {
        side: OptionSide,
        strike: Decimal,
        premium: Decimal,
        required_move_pct: Decimal,
        return_at_extended_move_pct: Decimal,
    },
    NakedShort {
        side: OptionSide,
        strike: Decimal,
        premium: Decimal,
        margin_required: Decimal,
        otm_pct: Decimal,
    },
    CashSecuredPut {
        strike: Decimal,
        premium: Decimal,
        collateral: Decimal,
        protection_pct: Decimal,
    },
    CoveredCall {
        strike: Decimal,
        premium: Decimal,
        if_called_pct: Decimal,
        upside_pct: Decimal,
    },
    DebitSpread {
        side: OptionSide,
        long_strike: Decimal,
        short_strike: Decimal,
        debit: Decimal,
    },
    CreditSpread {
        side: OptionSide,
        short_strike: Decimal,
        long_strike: Decimal,
        credit: Decimal,
    },
    Straddle {
        strike: Decimal,
        call_price: Decimal,
        put_price: Decimal,
        debit: Decimal,
        required_move_pct: Decimal,
        call_quote: Option<QuoteSnapshot>,
        put_quote: Option<QuoteSnapshot>,
    },
    Strangle {
        put_strike: Decimal,
        call_strike: Decimal,
        call_price: Decimal,
        put_price: Decimal,
        debit: Decimal,
        required_move_pct: Decimal,
        call_quote: Option<QuoteSnapshot>,
        put_quote: Option<QuoteSnapshot>,
    },
    IronCondor {
        put_long: Decimal,
        put_short: Decimal,
        call_short: Decimal,
        call_long: Decimal,
        credit: Decimal,
    },
}

/// A single detected opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub ticker: String,
    pub strategy: StrategyKind,
    pub expiration: NaiveDate,
    pub dte: u32,
    pub spot_price: Decimal,
    /// Ranking metric. Annualized ROI for premium sellers, return on risk for
    /// spreads, % gain on a target move for long options, required move for
    /// straddles/strangles.
    pub return_pct: Decimal,
    pub position: Position,
    pub breakeven: Breakeven,
    pub max_profit: Option<Decimal>,
    /// `None` when the loss is theoretically unbounded
    pub max_loss: Option<Decimal>,
    pub probability_itm: Option<Decimal>,
    /// Data of the single traded quote. Two-leg volatility plays carry one
    /// snapshot per leg on the position instead.
    pub quote: Option<QuoteSnapshot>,
}

impl StrategyResult {
    /// Human-readable name, distinguishing put and call credit spreads
    pub fn display_name(&self) -> &'static str {
        match &self.position {
            Position::CreditSpread {
                side: OptionSide::Put,
                ..
            } => "Put Credit Spread",
            Position::CreditSpread {
                side: OptionSide::Call,
                ..
            } => "Call Credit Spread",
            _ => self.strategy.name(),
        }
    }
}
