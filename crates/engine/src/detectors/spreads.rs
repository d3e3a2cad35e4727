//! Vertical spreads: bull call, bear put, and put/call credit spreads

use rust_decimal::Decimal;

use super::{ascending, base_result, clears_min_return, descending, probability, ChainView};
use crate::chain::OptionQuote;
use crate::config::ScannerConfig;
use crate::metrics::{return_on_risk, round_money};
use crate::types::{Breakeven, OptionSide, Position, ScanContext, StrategyKind, StrategyResult};

/// Debit spread candidate that survived the degenerate checks. Every figure
/// derives from the debit rounded to the cent.
struct Debit {
    debit: Decimal,
    max_profit: Decimal,
    ror: Decimal,
}

fn price_debit_spread(long: &OptionQuote, short: &OptionQuote, width: Decimal) -> Option<Debit> {
    let debit = round_money(long.price - short.price);
    if debit <= Decimal::ZERO {
        return None;
    }
    let max_profit = width - debit;
    if max_profit <= Decimal::ZERO {
        return None;
    }
    let ror = return_on_risk(max_profit, debit)?;
    Some(Debit {
        debit,
        max_profit,
        ror,
    })
}

/// Buy a near-the-money call, sell a higher one. Every short strike within
/// the width limit is tried for each long strike.
pub fn find_bull_call_spreads(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;
    let low = spot * config.bull_long_strike_min;
    let high = spot * config.bull_long_strike_max;
    let strikes = ascending(view.calls);

    let mut results = Vec::new();
    for (i, long) in strikes.iter().enumerate() {
        if long.strike < low || long.strike > high {
            continue;
        }
        let width_limit = long.strike * config.bull_max_width_ratio;

        for short in &strikes[i + 1..] {
            if short.strike > width_limit {
                break;
            }
            let Some(spread) = price_debit_spread(long, short, short.strike - long.strike) else {
                continue;
            };
            if !clears_min_return(ctx, spread.ror) {
                continue;
            }

            results.push(StrategyResult {
                max_profit: Some(spread.max_profit),
                max_loss: Some(spread.debit),
                probability_itm: probability(ctx, long.strike, config),
                ..base_result(
                    ctx,
                    StrategyKind::BullCallSpread,
                    spread.ror,
                    Position::DebitSpread {
                        side: OptionSide::Call,
                        long_strike: long.strike,
                        short_strike: short.strike,
                        debit: spread.debit,
                    },
                    Breakeven::single(round_money(long.strike + spread.debit)),
                )
            });
        }
    }
    results
}

/// Buy a near-the-money put, sell a lower one; strikes walked high to low
pub fn find_bear_put_spreads(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;
    let low = spot * config.bear_long_strike_min;
    let high = spot * config.bear_long_strike_max;
    let strikes = descending(view.puts);

    let mut results = Vec::new();
    for (i, long) in strikes.iter().enumerate() {
        if long.strike > high || long.strike < low {
            continue;
        }
        let width_limit = long.strike * config.bear_min_width_ratio;

        for short in &strikes[i + 1..] {
            if short.strike < width_limit {
                break;
            }
            let Some(spread) = price_debit_spread(long, short, long.strike - short.strike) else {
                continue;
            };
            if !clears_min_return(ctx, spread.ror) {
                continue;
            }

            results.push(StrategyResult {
                max_profit: Some(spread.max_profit),
                max_loss: Some(spread.debit),
                probability_itm: probability(ctx, long.strike, config),
                ..base_result(
                    ctx,
                    StrategyKind::BearPutSpread,
                    spread.ror,
                    Position::DebitSpread {
                        side: OptionSide::Put,
                        long_strike: long.strike,
                        short_strike: short.strike,
                        debit: spread.debit,
                    },
                    Breakeven::single(round_money(long.strike - spread.debit)),
                )
            });
        }
    }
    results
}

/// Sell the nearer OTM strike, buy the next one out. Puts first, then calls.
pub fn find_credit_spreads(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;
    let mut results = Vec::new();

    let otm_puts: Vec<&OptionQuote> = descending(view.puts)
        .into_iter()
        .filter(|q| q.strike < spot)
        .collect();
    let put_boundary = spot * config.put_wing_boundary;
    for pair in otm_puts.windows(2) {
        let (short, long) = (pair[0], pair[1]);
        if short.strike >= put_boundary {
            continue;
        }
        if let Some(result) = credit_spread(ctx, OptionSide::Put, short, long) {
            results.push(result);
        }
    }

    let otm_calls: Vec<&OptionQuote> = ascending(view.calls)
        .into_iter()
        .filter(|q| q.strike > spot)
        .collect();
    let call_boundary = spot * config.call_wing_boundary;
    for pair in otm_calls.windows(2) {
        let (short, long) = (pair[0], pair[1]);
        if short.strike <= call_boundary {
            continue;
        }
        if let Some(result) = credit_spread(ctx, OptionSide::Call, short, long) {
            results.push(result);
        }
    }

    results
}

fn credit_spread(
    ctx: &ScanContext,
    side: OptionSide,
    short: &OptionQuote,
    long: &OptionQuote,
) -> Option<StrategyResult> {
    let credit = round_money(short.price - long.price);
    if credit <= Decimal::ZERO {
        return None;
    }
    let width = (short.strike - long.strike).abs();
    let max_loss = width - credit;
    let ror = return_on_risk(credit, max_loss)?;
    if !clears_min_return(ctx, ror) {
        return None;
    }

    let breakeven = match side {
        OptionSide::Put => short.strike - credit,
        OptionSide::Call => short.strike + credit,
    };

    Some(StrategyResult {
        max_profit: Some(credit),
        max_loss: Some(max_loss),
        ..base_result(
            ctx,
            StrategyKind::CreditSpread,
            ror,
            Position::CreditSpread {
                side,
                short_strike: short.strike,
                long_strike: long.strike,
                credit,
            },
            Breakeven::single(round_money(breakeven)),
        )
    })
}
