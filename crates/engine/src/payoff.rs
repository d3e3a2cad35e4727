//! Profit/loss at expiration for a detected position
//!
//! Pure functions of the fields already on a [`StrategyResult`]; used to draw
//! payoff diagrams, never for detection.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::ScannerConfig;
use crate::metrics::round_money;
use crate::types::{OptionSide, Position, StrategyResult};

/// Default number of points in [`price_grid`]
pub const DEFAULT_GRID_POINTS: usize = 100;

const GRID_LOW: Decimal = dec!(0.8);
const GRID_HIGH: Decimal = dec!(1.2);

/// Evenly spaced underlying prices from 0.8×spot to 1.2×spot, to the cent
pub fn price_grid(spot: Decimal, points: usize) -> Vec<Decimal> {
    match points {
        0 => Vec::new(),
        1 => vec![round_money(spot)],
        _ => {
            let low = spot * GRID_LOW;
            let step = (spot * GRID_HIGH - low) / Decimal::from(points - 1);
            (0..points)
                .map(|i| round_money(low + step * Decimal::from(i)))
                .collect()
        }
    }
}

/// Per-share P/L at each grid price, in the same units as the result's
/// money fields
pub fn evaluate_payoff(result: &StrategyResult, grid: &[Decimal]) -> Vec<Decimal> {
    scaled_payoff(result, grid, Decimal::ONE)
}

/// Per-contract P/L at each grid price, using the configured contract
/// multiplier
pub fn evaluate_payoff_per_contract(
    result: &StrategyResult,
    grid: &[Decimal],
    config: &ScannerConfig,
) -> Vec<Decimal> {
    scaled_payoff(result, grid, config.contract_multiplier)
}

fn scaled_payoff(result: &StrategyResult, grid: &[Decimal], multiplier: Decimal) -> Vec<Decimal> {
    grid.iter()
        .map(|&price| {
            let per_share = payoff_per_share(&result.position, result.spot_price, price);
            round_money(per_share * multiplier)
        })
        .collect()
}

fn call_value(strike: Decimal, price: Decimal) -> Decimal {
    (price - strike).max(Decimal::ZERO)
}

fn put_value(strike: Decimal, price: Decimal) -> Decimal {
    (strike - price).max(Decimal::ZERO)
}

fn intrinsic(side: OptionSide, strike: Decimal, price: Decimal) -> Decimal {
    match side {
        OptionSide::Call => call_value(strike, price),
        OptionSide::Put => put_value(strike, price),
    }
}

/// P/L per share at expiration with the underlying at `price`. `spot` is
/// the entry price of the stock leg for covered calls.
pub fn payoff_per_share(position: &Position, spot: Decimal, price: Decimal) -> Decimal {
    match *position {
        Position::LongOption {
            side,
            strike,
            premium,
            ..
        } => intrinsic(side, strike, price) - premium,

        Position::NakedShort {
            side,
            strike,
            premium,
            ..
        } => premium - intrinsic(side, strike, price),

        Position::CashSecuredPut {
            strike, premium, ..
        } => premium - put_value(strike, price),

        Position::CoveredCall {
            strike, premium, ..
        } => price.min(strike) - spot + premium,

        Position::DebitSpread {
            side,
            long_strike,
            short_strike,
            debit,
        } => intrinsic(side, long_strike, price) - intrinsic(side, short_strike, price) - debit,

        Position::CreditSpread {
            side,
            short_strike,
            long_strike,
            credit,
        } => credit - intrinsic(side, short_strike, price) + intrinsic(side, long_strike, price),

        Position::Straddle { strike, debit, .. } => (price - strike).abs() - debit,

        Position::Strangle {
            put_strike,
            call_strike,
            debit,
            ..
        } => put_value(put_strike, price) + call_value(call_strike, price) - debit,

        Position::IronCondor {
            put_long,
            put_short,
            call_short,
            call_long,
            credit,
        } => {
            credit - put_value(put_short, price) + put_value(put_long, price)
                - call_value(call_short, price)
                + call_value(call_long, price)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Breakeven, StrategyKind};
    use chrono::NaiveDate;

    fn make_result(strategy: StrategyKind, position: Position) -> StrategyResult {
        StrategyResult {
            ticker: "TEST".to_string(),
            strategy,
            expiration: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            dte: 30,
            spot_price: dec!(100),
            return_pct: dec!(50),
            position,
            breakeven: Breakeven::single(dec!(100)),
            max_profit: None,
            max_loss: None,
            probability_itm: None,
            quote: None,
        }
    }

    fn per_contract(result: &StrategyResult, grid: &[Decimal]) -> Vec<Decimal> {
        evaluate_payoff_per_contract(result, grid, &ScannerConfig::default())
    }

    #[test]
    fn test_price_grid() {
        let grid = price_grid(dec!(100), 5);
        assert_eq!(grid, vec![dec!(80), dec!(90), dec!(100), dec!(110), dec!(120)]);

        let full = price_grid(dec!(250), DEFAULT_GRID_POINTS);
        assert_eq!(full.len(), 100);
        assert_eq!(full[0], dec!(200));
        assert_eq!(full[99], dec!(300));
        assert!(full.windows(2).all(|w| w[0] < w[1]));

        assert!(price_grid(dec!(100), 0).is_empty());
        assert_eq!(price_grid(dec!(100), 1), vec![dec!(100)]);
    }

    #[test]
    fn test_bull_call_spread_shape() {
        let result = make_result(
            StrategyKind::BullCallSpread,
            Position::DebitSpread {
                side: OptionSide::Call,
                long_strike: dec!(100),
                short_strike: dec!(105),
                debit: dec!(2),
            },
        );
        let grid = [dec!(90), dec!(100), dec!(102), dec!(104), dec!(105), dec!(120)];
        let pl = per_contract(&result, &grid);
        // flat loss, ramp through breakeven, flat max profit
        assert_eq!(pl, vec![dec!(-200), dec!(-200), dec!(0), dec!(200), dec!(300), dec!(300)]);
    }

    #[test]
    fn test_bear_put_spread_shape() {
        let result = make_result(
            StrategyKind::BearPutSpread,
            Position::DebitSpread {
                side: OptionSide::Put,
                long_strike: dec!(100),
                short_strike: dec!(95),
                debit: dec!(2.5),
            },
        );
        let pl = per_contract(&result, &[dec!(90), dec!(97.5), dec!(110)]);
        assert_eq!(pl, vec![dec!(250), dec!(0), dec!(-250)]);
    }

    #[test]
    fn test_cash_secured_put_shape() {
        let result = make_result(
            StrategyKind::CashSecuredPut,
            Position::CashSecuredPut {
                strike: dec!(95),
                premium: dec!(2),
                collateral: dec!(9500),
                protection_pct: dec!(7),
            },
        );
        let pl = per_contract(&result, &[dec!(80), dec!(90), dec!(93), dec!(95), dec!(110)]);
        // linear below the strike, flat premium above
        assert_eq!(pl, vec![dec!(-1300), dec!(-300), dec!(0), dec!(200), dec!(200)]);
    }

    #[test]
    fn test_iron_condor_shape() {
        let result = make_result(
            StrategyKind::IronCondor,
            Position::IronCondor {
                put_long: dec!(80),
                put_short: dec!(90),
                call_short: dec!(110),
                call_long: dec!(120),
                credit: dec!(1.8),
            },
        );
        let grid = [dec!(70), dec!(85), dec!(88.2), dec!(100), dec!(111.8), dec!(130)];
        let pl = per_contract(&result, &grid);
        assert_eq!(
            pl,
            vec![dec!(-820), dec!(-320), dec!(0), dec!(180), dec!(0), dec!(-820)]
        );
    }

    #[test]
    fn test_covered_call_caps_upside() {
        let result = make_result(
            StrategyKind::CoveredCall,
            Position::CoveredCall {
                strike: dec!(105),
                premium: dec!(2),
                if_called_pct: dec!(7),
                upside_pct: dec!(5),
            },
        );
        let pl = per_contract(&result, &[dec!(90), dec!(98), dec!(105), dec!(120)]);
        assert_eq!(pl, vec![dec!(-800), dec!(0), dec!(700), dec!(700)]);
    }

    #[test]
    fn test_long_and_naked_options() {
        let long_put = Position::LongOption {
            side: OptionSide::Put,
            strike: dec!(100),
            premium: dec!(3),
            required_move_pct: dec!(3),
            return_at_extended_move_pct: dec!(466.7),
        };
        assert_eq!(payoff_per_share(&long_put, dec!(100), dec!(90)), dec!(7));
        assert_eq!(payoff_per_share(&long_put, dec!(100), dec!(110)), dec!(-3));

        let naked_call = Position::NakedShort {
            side: OptionSide::Call,
            strike: dec!(104),
            premium: dec!(1),
            margin_required: dec!(2080),
            otm_pct: dec!(4),
        };
        assert_eq!(payoff_per_share(&naked_call, dec!(100), dec!(100)), dec!(1));
        assert_eq!(payoff_per_share(&naked_call, dec!(100), dec!(110)), dec!(-5));
    }

    #[test]
    fn test_volatility_positions() {
        let straddle = Position::Straddle {
            strike: dec!(100),
            call_price: dec!(3),
            put_price: dec!(3),
            debit: dec!(6),
            required_move_pct: dec!(6),
            call_quote: None,
            put_quote: None,
        };
        assert_eq!(payoff_per_share(&straddle, dec!(100), dec!(100)), dec!(-6));
        assert_eq!(payoff_per_share(&straddle, dec!(100), dec!(94)), dec!(0));
        assert_eq!(payoff_per_share(&straddle, dec!(100), dec!(110)), dec!(4));

        let strangle = Position::Strangle {
            put_strike: dec!(95),
            call_strike: dec!(105),
            call_price: dec!(1.5),
            put_price: dec!(1),
            debit: dec!(2.5),
            required_move_pct: dec!(7.5),
            call_quote: None,
            put_quote: None,
        };
        assert_eq!(payoff_per_share(&strangle, dec!(100), dec!(100)), dec!(-2.5));
        assert_eq!(payoff_per_share(&strangle, dec!(100), dec!(107.5)), dec!(0));
        assert_eq!(payoff_per_share(&strangle, dec!(100), dec!(85)), dec!(7.5));

        let put_credit = Position::CreditSpread {
            side: OptionSide::Put,
            short_strike: dec!(90),
            long_strike: dec!(85),
            credit: dec!(1.1),
        };
        assert_eq!(payoff_per_share(&put_credit, dec!(100), dec!(100)), dec!(1.1));
        assert_eq!(payoff_per_share(&put_credit, dec!(100), dec!(80)), dec!(-3.9));
    }

    #[test]
    fn test_custom_multiplier() {
        let result = make_result(
            StrategyKind::CashSecuredPut,
            Position::CashSecuredPut {
                strike: dec!(95),
                premium: dec!(2),
                collateral: dec!(9500),
                protection_pct: dec!(7),
            },
        );
        let mini = ScannerConfig {
            contract_multiplier: dec!(10),
            ..ScannerConfig::default()
        };
        let grid = [dec!(90), dec!(100)];
        assert_eq!(
            evaluate_payoff_per_contract(&result, &grid, &mini),
            vec![dec!(-30), dec!(20)]
        );
        // Per-share curve is independent of the multiplier
        assert_eq!(evaluate_payoff(&result, &grid), vec![dec!(-3), dec!(2)]);
    }

    #[test]
    fn test_per_contract_follows_config() {
        let result = make_result(
            StrategyKind::BullCallSpread,
            Position::DebitSpread {
                side: OptionSide::Call,
                long_strike: dec!(100),
                short_strike: dec!(105),
                debit: dec!(2.03),
            },
        );
        let grid = [dec!(95), dec!(110)];
        assert_eq!(evaluate_payoff(&result, &grid), vec![dec!(-2.03), dec!(2.97)]);
        assert_eq!(per_contract(&result, &grid), vec![dec!(-203), dec!(297)]);
    }
}
