//! Tunable constants for detectors and the metrics engine
//!
//! The naked-option margin model and the probability heuristic are arbitrary
//! rules of thumb, so they live here instead of being baked into detectors.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Parameters for the simplified probability-of-ITM heuristic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbabilityConfig {
    /// Probability assigned to an at-the-money strike (default 50)
    pub baseline_pct: Decimal,
    /// Assumed daily move as a fraction of spot (default 0.01)
    pub daily_move: Decimal,
    /// Points subtracted per unit of scaled distance (default 10)
    pub distance_scale: Decimal,
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self {
            baseline_pct: dec!(50),
            daily_move: dec!(0.01),
            distance_scale: dec!(10),
        }
    }
}

/// Scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Margin held against a naked short, as a fraction of strike (default 0.20)
    pub naked_margin_rate: Decimal,
    pub probability: ProbabilityConfig,

    /// Long calls: strike window as multiples of spot
    pub long_call_strike_min: Decimal,
    pub long_call_strike_max: Decimal,
    /// Long puts: strike window as multiples of spot
    pub long_put_strike_min: Decimal,
    pub long_put_strike_max: Decimal,
    /// Move (in %) used to score long options (default 10)
    pub long_target_move_pct: Decimal,
    /// Secondary move (in %) reported alongside (default 20)
    pub long_extended_move_pct: Decimal,
    /// Long options requiring a larger move to break even are skipped
    pub long_max_required_move_pct: Decimal,

    /// Naked shorts must be at least this far OTM (in %, exclusive)
    pub naked_min_otm_pct: Decimal,

    /// Bull call spreads: long strike window and max short/long ratio
    pub bull_long_strike_min: Decimal,
    pub bull_long_strike_max: Decimal,
    pub bull_max_width_ratio: Decimal,
    /// Bear put spreads: long strike window and min short/long ratio
    pub bear_long_strike_min: Decimal,
    pub bear_long_strike_max: Decimal,
    pub bear_min_width_ratio: Decimal,

    /// Short puts of credit spreads and iron condors sit below spot × this
    pub put_wing_boundary: Decimal,
    /// Short calls of credit spreads and iron condors sit above spot × this
    pub call_wing_boundary: Decimal,

    /// Shares per contract
    pub contract_multiplier: Decimal,
    /// Tickers whose market data is fetched concurrently
    pub max_concurrent_tickers: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            naked_margin_rate: dec!(0.20),
            probability: ProbabilityConfig::default(),
            long_call_strike_min: dec!(0.95),
            long_call_strike_max: dec!(1.10),
            long_put_strike_min: dec!(0.90),
            long_put_strike_max: dec!(1.05),
            long_target_move_pct: dec!(10),
            long_extended_move_pct: dec!(20),
            long_max_required_move_pct: dec!(15),
            naked_min_otm_pct: dec!(3),
            bull_long_strike_min: dec!(0.90),
            bull_long_strike_max: dec!(1.05),
            bull_max_width_ratio: dec!(1.15),
            bear_long_strike_min: dec!(0.95),
            bear_long_strike_max: dec!(1.10),
            bear_min_width_ratio: dec!(0.85),
            put_wing_boundary: dec!(0.95),
            call_wing_boundary: dec!(1.05),
            contract_multiplier: dec!(100),
            max_concurrent_tickers: 4,
        }
    }
}

impl ScannerConfig {
    /// Reject settings that would make every downstream computation meaningless
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.naked_margin_rate <= Decimal::ZERO {
            return Err(ScanError::InvalidConfig(
                "naked_margin_rate must be positive".to_string(),
            ));
        }
        if self.probability.daily_move <= Decimal::ZERO {
            return Err(ScanError::InvalidConfig(
                "probability.daily_move must be positive".to_string(),
            ));
        }
        if self.contract_multiplier <= Decimal::ZERO {
            return Err(ScanError::InvalidConfig(
                "contract_multiplier must be positive".to_string(),
            ));
        }
        if self.max_concurrent_tickers == 0 {
            return Err(ScanError::InvalidConfig(
                "max_concurrent_tickers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
