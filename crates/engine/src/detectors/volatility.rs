//! Volatility plays: long straddle, long strangle, iron condor

use rust_decimal::Decimal;

use super::{base_result, clears_min_return, ChainView};
use crate::config::ScannerConfig;
use crate::metrics::{pct_of, return_on_risk, round_money, round_pct};
use crate::types::{Breakeven, Position, ScanContext, StrategyKind, StrategyResult};

/// ATM straddle. Ranked by the move needed to break even, not gated.
pub fn find_straddles(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    _config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;

    // Nearest strike quoted on both sides; ties go to the lower strike
    let atm = view
        .calls
        .keys()
        .filter(|k| view.puts.contains_key(*k))
        .min_by_key(|k| (**k - spot).abs());
    let Some(strike) = atm.copied() else {
        return Vec::new();
    };
    let (Some(call), Some(put)) = (view.calls.get(&strike), view.puts.get(&strike)) else {
        return Vec::new();
    };

    let call_price = round_money(call.price);
    let put_price = round_money(put.price);
    let debit = call_price + put_price;
    let required_move = pct_of(debit, strike);

    vec![StrategyResult {
        max_loss: Some(debit),
        ..base_result(
            ctx,
            StrategyKind::LongStraddle,
            required_move,
            Position::Straddle {
                strike,
                call_price,
                put_price,
                debit,
                required_move_pct: round_pct(required_move),
                call_quote: call.snapshot(),
                put_quote: put.snapshot(),
            },
            Breakeven::range(strike - debit, strike + debit),
        )
    }]
}

/// Nearest OTM put and nearest OTM call
pub fn find_strangles(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    _config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;

    let put = view.puts.range(..spot).next_back().map(|(_, q)| q);
    let call = view
        .calls
        .iter()
        .find(|(k, _)| **k > spot)
        .map(|(_, q)| q);
    let (Some(put), Some(call)) = (put, call) else {
        return Vec::new();
    };

    let call_price = round_money(call.price);
    let put_price = round_money(put.price);
    let debit = call_price + put_price;
    let upper = call.strike + debit;
    let lower = put.strike - debit;
    let required_move = pct_of((upper - spot).abs(), spot).min(pct_of((spot - lower).abs(), spot));

    vec![StrategyResult {
        max_loss: Some(debit),
        ..base_result(
            ctx,
            StrategyKind::LongStrangle,
            required_move,
            Position::Strangle {
                put_strike: put.strike,
                call_strike: call.strike,
                call_price,
                put_price,
                debit,
                required_move_pct: round_pct(required_move),
                call_quote: call.snapshot(),
                put_quote: put.snapshot(),
            },
            Breakeven::range(lower, upper),
        )
    }]
}

/// Short put spread plus short call spread over four consecutive strikes
/// of the combined chain
pub fn find_iron_condors(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;
    let put_boundary = spot * config.put_wing_boundary;
    let call_boundary = spot * config.call_wing_boundary;

    let mut strikes: Vec<Decimal> = view.calls.keys().chain(view.puts.keys()).copied().collect();
    strikes.sort();
    strikes.dedup();

    let mut results = Vec::new();
    for window in strikes.windows(4) {
        let (put_long, put_short, call_short, call_long) = (window[0], window[1], window[2], window[3]);
        if put_short > put_boundary || call_short < call_boundary {
            continue;
        }

        let legs = (
            view.puts.get(&put_long),
            view.puts.get(&put_short),
            view.calls.get(&call_short),
            view.calls.get(&call_long),
        );
        let (Some(pl), Some(ps), Some(cs), Some(cl)) = legs else {
            continue;
        };

        let credit = round_money((ps.price - pl.price) + (cs.price - cl.price));
        if credit <= Decimal::ZERO {
            continue;
        }
        let max_loss = (put_short - put_long).max(call_long - call_short) - credit;
        let Some(ror) = return_on_risk(credit, max_loss) else {
            continue;
        };
        if !clears_min_return(ctx, ror) {
            continue;
        }

        results.push(StrategyResult {
            max_profit: Some(credit),
            max_loss: Some(max_loss),
            ..base_result(
                ctx,
                StrategyKind::IronCondor,
                ror,
                Position::IronCondor {
                    put_long,
                    put_short,
                    call_short,
                    call_long,
                    credit,
                },
                Breakeven::range(put_short - credit, call_short + credit),
            )
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::ChainSides;
    use super::*;
    use crate::chain::{Chain, OptionQuote};
    use rust_decimal_macros::dec;

    fn run(
        detect: super::super::DetectFn,
        chain: &Chain,
        min_return: Decimal,
    ) -> Vec<StrategyResult> {
        let ctx = ctx(dec!(100), 30, min_return);
        detect(&ctx, &ChainView::new(chain, ChainSides::Both), &ScannerConfig::default())
    }

    #[test]
    fn test_straddle_picks_nearest_common_strike() {
        let chain = make_chain(
            &[(dec!(95), dec!(6)), (dec!(100), dec!(3)), (dec!(101), dec!(2.5))],
            &[(dec!(95), dec!(1)), (dec!(100), dec!(3))],
        );
        // 101 is nearest but has no put
        let results = run(find_straddles, &chain, dec!(1000));
        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(
            r.position,
            Position::Straddle {
                strike: dec!(100),
                call_price: dec!(3),
                put_price: dec!(3),
                debit: dec!(6),
                required_move_pct: dec!(6.0),
                call_quote: None,
                put_quote: None,
            }
        );
        // Not return-gated: the min return above would exclude everything else
        assert_eq!(r.return_pct, dec!(6.0));
        assert_eq!(r.breakeven, Breakeven::range(dec!(94), dec!(106)));
        assert_eq!(r.max_loss, Some(dec!(6)));
        assert_eq!(r.max_profit, None);
    }

    #[test]
    fn test_straddle_and_strangle_keep_both_leg_quotes() {
        let leg = |strike, price, delta, open_interest| {
            let mut q = OptionQuote::new(strike, price);
            q.delta = Some(delta);
            q.open_interest = open_interest;
            q
        };
        let chain = Chain::from_quotes(
            vec![
                leg(dec!(100), dec!(3), dec!(0.52), 900),
                leg(dec!(105), dec!(1.5), dec!(0.3), 400),
            ],
            vec![
                leg(dec!(95), dec!(1), dec!(-0.28), 700),
                leg(dec!(100), dec!(3), dec!(-0.48), 800),
            ],
        );

        let straddle = run(find_straddles, &chain, Decimal::ZERO);
        let Position::Straddle {
            call_quote: Some(call),
            put_quote: Some(put),
            ..
        } = &straddle[0].position
        else {
            panic!("missing leg quotes on {:?}", straddle[0].position);
        };
        assert_eq!((call.delta, call.open_interest), (Some(dec!(0.52)), 900));
        assert_eq!((put.delta, put.open_interest), (Some(dec!(-0.48)), 800));
        assert_eq!(straddle[0].quote, None);

        let strangle = run(find_strangles, &chain, Decimal::ZERO);
        let Position::Strangle {
            call_quote: Some(call),
            put_quote: Some(put),
            ..
        } = &strangle[0].position
        else {
            panic!("missing leg quotes on {:?}", strangle[0].position);
        };
        assert_eq!(call.delta, Some(dec!(0.3)));
        assert_eq!(put.delta, Some(dec!(-0.28)));
    }

    #[test]
    fn test_straddle_debit_is_sum_of_stored_legs() {
        let chain = make_chain(&[(dec!(100), dec!(3.005))], &[(dec!(100), dec!(2.995))]);
        let results = run(find_straddles, &chain, Decimal::ZERO);
        let r = &results[0];
        let Position::Straddle {
            call_price,
            put_price,
            debit,
            ..
        } = r.position
        else {
            panic!("unexpected position {:?}", r.position);
        };
        assert_eq!((call_price, put_price), (dec!(3.01), dec!(3.00)));
        assert_eq!(debit, call_price + put_price);
        assert_eq!(r.max_loss, Some(debit));
        assert_eq!(r.breakeven, Breakeven::range(dec!(100) - debit, dec!(100) + debit));
    }

    #[test]
    fn test_straddle_tie_goes_to_lower_strike() {
        let chain = make_chain(
            &[(dec!(95), dec!(6)), (dec!(105), dec!(2))],
            &[(dec!(95), dec!(1.5)), (dec!(105), dec!(6))],
        );
        let results = run(find_straddles, &chain, Decimal::ZERO);
        assert!(matches!(
            results[0].position,
            Position::Straddle { strike, .. } if strike == dec!(95)
        ));
    }

    #[test]
    fn test_strangle() {
        let chain = make_chain(
            &[(dec!(100), dec!(3)), (dec!(105), dec!(1.5)), (dec!(110), dec!(0.5))],
            &[(dec!(90), dec!(0.5)), (dec!(95), dec!(1)), (dec!(100), dec!(3))],
        );
        let results = run(find_strangles, &chain, dec!(1000));
        assert_eq!(results.len(), 1);
        let r = &results[0];
        // debit 2.5: breakevens 92.5 / 107.5, both 7.5% away
        assert_eq!(r.return_pct, dec!(7.5));
        assert_eq!(r.breakeven, Breakeven::range(dec!(92.5), dec!(107.5)));
        assert!(matches!(
            r.position,
            Position::Strangle { put_strike, call_strike, .. }
                if put_strike == dec!(95) && call_strike == dec!(105)
        ));
    }

    #[test]
    fn test_strangle_needs_both_wings() {
        let chain = make_chain(&[(dec!(105), dec!(1.5))], &[(dec!(100), dec!(3))]);
        assert!(run(find_strangles, &chain, Decimal::ZERO).is_empty());
    }

    #[test]
    fn test_iron_condor() {
        let chain = make_chain(
            &[(dec!(110), dec!(1.2)), (dec!(120), dec!(0.2))],
            &[(dec!(80), dec!(0.2)), (dec!(90), dec!(1.0))],
        );
        let results = run(find_iron_condors, &chain, dec!(20));
        assert_eq!(results.len(), 1);
        let r = &results[0];
        // credit 0.8 + 1.0 = 1.8, max loss 10 − 1.8 = 8.2
        assert_eq!(r.max_profit, Some(dec!(1.8)));
        assert_eq!(r.max_loss, Some(dec!(8.2)));
        assert_eq!(r.return_pct, dec!(22.0));
        assert_eq!(r.breakeven, Breakeven::range(dec!(88.2), dec!(111.8)));

        let Position::IronCondor {
            put_long,
            put_short,
            call_short,
            call_long,
            credit,
        } = r.position
        else {
            panic!("unexpected position");
        };
        assert!(put_long < put_short && put_short <= call_short && call_short < call_long);
        assert!(credit > Decimal::ZERO);
    }

    #[test]
    fn test_iron_condor_figures_agree_on_half_cent_credit() {
        let chain = make_chain(
            &[(dec!(110), dec!(1.2)), (dec!(120), dec!(0.2))],
            &[(dec!(80), dec!(0.2)), (dec!(90), dec!(1.005))],
        );
        let results = run(find_iron_condors, &chain, dec!(20));
        assert_eq!(results.len(), 1);
        let r = &results[0];
        // raw credit 1.805 rounds once to 1.81
        let (credit, max_loss) = (r.max_profit.unwrap(), r.max_loss.unwrap());
        assert_eq!(credit, dec!(1.81));
        assert_eq!(max_loss, dec!(8.19));
        assert_eq!(credit + max_loss, dec!(10));
        assert_eq!(r.return_pct, round_pct(credit / max_loss * dec!(100)));
        assert_eq!(r.return_pct, dec!(22.1));
        assert_eq!(r.breakeven, Breakeven::range(dec!(88.19), dec!(111.81)));
    }

    #[test]
    fn test_iron_condor_without_credit() {
        let chain = make_chain(
            &[(dec!(110), dec!(0.2)), (dec!(120), dec!(1.2))],
            &[(dec!(80), dec!(1.0)), (dec!(90), dec!(0.2))],
        );
        assert!(run(find_iron_condors, &chain, Decimal::ZERO).is_empty());
    }

    #[test]
    fn test_iron_condor_short_strikes_too_close() {
        let chain = make_chain(
            &[(dec!(103), dec!(1.2)), (dec!(120), dec!(0.2))],
            &[(dec!(80), dec!(0.2)), (dec!(90), dec!(1.0))],
        );
        assert!(run(find_iron_condors, &chain, Decimal::ZERO).is_empty());
    }
}
