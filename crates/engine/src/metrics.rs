//! Shared math for every detector: return on risk, annualization,
//! breakevens, and the coarse probability-of-ITM heuristic.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::config::ProbabilityConfig;

const HUNDRED: Decimal = dec!(100);
const DAYS_PER_YEAR: Decimal = dec!(365);

/// reward / risk × 100; `None` when there is nothing at risk
pub fn return_on_risk(reward: Decimal, risk: Decimal) -> Option<Decimal> {
    if risk <= Decimal::ZERO {
        return None;
    }
    Some(reward / risk * HUNDRED)
}

/// Scale a holding-period return to a 365-day year. `dte` is always > 0 here.
pub fn annualize(period_return_pct: Decimal, dte: u32) -> Decimal {
    period_return_pct * DAYS_PER_YEAR / Decimal::from(dte)
}

/// `part` as a percentage of `whole`
pub fn pct_of(part: Decimal, whole: Decimal) -> Decimal {
    part / whole * HUNDRED
}

pub fn call_breakeven(strike: Decimal, premium: Decimal) -> Decimal {
    strike + premium
}

pub fn put_breakeven(strike: Decimal, premium: Decimal) -> Decimal {
    strike - premium
}

/// Coarse probability (in %) that `strike` finishes in the money.
///
/// baseline − scale × (|strike − spot| / spot) / (daily_move × √dte), clamped
/// to [0, 100] and rounded to 1 dp. Not a pricing model.
pub fn probability_itm_heuristic(
    spot: Decimal,
    strike: Decimal,
    dte: u32,
    config: &ProbabilityConfig,
) -> Decimal {
    if spot <= Decimal::ZERO || dte == 0 {
        return Decimal::ZERO;
    }
    let distance = ((strike - spot).abs() / spot).to_f64().unwrap_or(0.0);
    let daily_move = config.daily_move.to_f64().unwrap_or(0.01);
    let scale = config.distance_scale.to_f64().unwrap_or(10.0);
    let baseline = config.baseline_pct.to_f64().unwrap_or(50.0);

    let scaled = distance / (daily_move * (dte as f64).sqrt());
    let prob = (baseline - scaled * scale).clamp(0.0, 100.0);

    Decimal::from_f64(prob)
        .map(round_pct)
        .unwrap_or(Decimal::ZERO)
}

/// Money fields are reported to the cent
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Percentages are reported to one decimal place
pub fn round_pct(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
