//! Single-leg strategies: long and naked short options, cash-secured puts,
//! covered calls

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{base_result, clears_min_return, probability, ChainView};
use crate::config::ScannerConfig;
use crate::metrics::{
    annualize, call_breakeven, pct_of, put_breakeven, round_money, round_pct,
};
use crate::types::{Breakeven, OptionSide, Position, ScanContext, StrategyKind, StrategyResult};

const HUNDRED: Decimal = dec!(100);
const LOSS_OF_PREMIUM: Decimal = dec!(-100);

/// % gain on premium if the underlying reaches `target`; −100 when the target
/// does not clear the breakeven
fn move_return(side: OptionSide, target: Decimal, breakeven: Decimal, premium: Decimal) -> Decimal {
    let intrinsic_past_be = match side {
        OptionSide::Call => target - breakeven,
        OptionSide::Put => breakeven - target,
    };
    if intrinsic_past_be > Decimal::ZERO {
        pct_of(intrinsic_past_be, premium)
    } else {
        LOSS_OF_PREMIUM
    }
}

/// Near-the-money and slightly OTM calls, scored on a 10% rally
pub fn find_long_calls(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;
    let low = spot * config.long_call_strike_min;
    let high = spot * config.long_call_strike_max;
    let target = spot * (HUNDRED + config.long_target_move_pct) / HUNDRED;
    let extended = spot * (HUNDRED + config.long_extended_move_pct) / HUNDRED;

    let mut results = Vec::new();
    for quote in view.calls.values() {
        if quote.strike < low || quote.strike > high {
            continue;
        }
        let premium = round_money(quote.price);
        let breakeven = call_breakeven(quote.strike, premium);
        let required_move = pct_of(breakeven - spot, spot);
        if round_pct(required_move) >= config.long_max_required_move_pct {
            continue;
        }

        let ret = move_return(OptionSide::Call, target, breakeven, premium);
        if !clears_min_return(ctx, ret) {
            continue;
        }
        let ret_extended = move_return(OptionSide::Call, extended, breakeven, premium);

        results.push(StrategyResult {
            max_loss: Some(premium),
            probability_itm: probability(ctx, quote.strike, config),
            quote: quote.snapshot(),
            ..base_result(
                ctx,
                StrategyKind::LongCall,
                ret,
                Position::LongOption {
                    side: OptionSide::Call,
                    strike: quote.strike,
                    premium,
                    required_move_pct: round_pct(required_move),
                    return_at_extended_move_pct: round_pct(ret_extended),
                },
                Breakeven::single(round_money(breakeven)),
            )
        });
    }
    results
}

/// Near-the-money and slightly OTM puts, scored on a 10% drop
pub fn find_long_puts(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;
    let low = spot * config.long_put_strike_min;
    let high = spot * config.long_put_strike_max;
    let target = spot * (HUNDRED - config.long_target_move_pct) / HUNDRED;
    let extended = spot * (HUNDRED - config.long_extended_move_pct) / HUNDRED;

    let mut results = Vec::new();
    for quote in view.puts.values() {
        if quote.strike < low || quote.strike > high {
            continue;
        }
        let premium = round_money(quote.price);
        let breakeven = put_breakeven(quote.strike, premium);
        let required_move = pct_of(spot - breakeven, spot);
        if round_pct(required_move) >= config.long_max_required_move_pct {
            continue;
        }

        let ret = move_return(OptionSide::Put, target, breakeven, premium);
        if !clears_min_return(ctx, ret) {
            continue;
        }
        let ret_extended = move_return(OptionSide::Put, extended, breakeven, premium);

        results.push(StrategyResult {
            // Underlying going to zero
            max_profit: Some(round_money(breakeven.max(Decimal::ZERO))),
            max_loss: Some(premium),
            probability_itm: probability(ctx, quote.strike, config),
            quote: quote.snapshot(),
            ..base_result(
                ctx,
                StrategyKind::LongPut,
                ret,
                Position::LongOption {
                    side: OptionSide::Put,
                    strike: quote.strike,
                    premium,
                    required_move_pct: round_pct(required_move),
                    return_at_extended_move_pct: round_pct(ret_extended),
                },
                Breakeven::single(round_money(breakeven)),
            )
        });
    }
    results
}

/// Annualized premium yield on the assumed margin of a naked short
fn naked_return(premium: Decimal, strike: Decimal, dte: u32, config: &ScannerConfig) -> (Decimal, Decimal) {
    let margin = strike * config.naked_margin_rate;
    (annualize(pct_of(premium, margin), dte), margin)
}

/// OTM calls sold naked
pub fn find_short_calls(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;
    let mut results = Vec::new();

    for quote in view.calls.values() {
        if quote.strike <= spot {
            continue;
        }
        let premium = round_money(quote.price);
        let (annual_return, margin) =
            naked_return(premium, quote.strike, ctx.days_to_expiration, config);
        let otm_pct = pct_of(quote.strike - spot, spot);

        if !clears_min_return(ctx, annual_return)
            || round_pct(otm_pct) <= config.naked_min_otm_pct
        {
            continue;
        }

        results.push(StrategyResult {
            max_profit: Some(premium),
            // Unbounded above
            max_loss: None,
            probability_itm: probability(ctx, quote.strike, config),
            quote: quote.snapshot(),
            ..base_result(
                ctx,
                StrategyKind::ShortCall,
                annual_return,
                Position::NakedShort {
                    side: OptionSide::Call,
                    strike: quote.strike,
                    premium,
                    margin_required: round_money(margin * config.contract_multiplier),
                    otm_pct: round_pct(otm_pct),
                },
                Breakeven::single(round_money(call_breakeven(quote.strike, premium))),
            )
        });
    }
    results
}

/// OTM puts sold naked
pub fn find_short_puts(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;
    let mut results = Vec::new();

    for quote in view.puts.values() {
        if quote.strike >= spot {
            continue;
        }
        let premium = round_money(quote.price);
        let (annual_return, margin) =
            naked_return(premium, quote.strike, ctx.days_to_expiration, config);
        let otm_pct = pct_of(spot - quote.strike, spot);

        if !clears_min_return(ctx, annual_return)
            || round_pct(otm_pct) <= config.naked_min_otm_pct
        {
            continue;
        }

        let breakeven = put_breakeven(quote.strike, premium);
        results.push(StrategyResult {
            max_profit: Some(premium),
            max_loss: Some(round_money(breakeven.max(Decimal::ZERO))),
            probability_itm: probability(ctx, quote.strike, config),
            quote: quote.snapshot(),
            ..base_result(
                ctx,
                StrategyKind::ShortPut,
                annual_return,
                Position::NakedShort {
                    side: OptionSide::Put,
                    strike: quote.strike,
                    premium,
                    margin_required: round_money(margin * config.contract_multiplier),
                    otm_pct: round_pct(otm_pct),
                },
                Breakeven::single(round_money(breakeven)),
            )
        });
    }
    results
}

/// OTM puts sold against cash equal to the strike
pub fn find_cash_secured_puts(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;
    let mut results = Vec::new();

    for quote in view.puts.values() {
        // Strictly below spot
        if quote.strike >= spot {
            continue;
        }
        let premium = round_money(quote.price);
        let annual_return = annualize(pct_of(premium, quote.strike), ctx.days_to_expiration);
        if !clears_min_return(ctx, annual_return) {
            continue;
        }
        let protection = pct_of(spot - quote.strike + premium, spot);
        let breakeven = put_breakeven(quote.strike, premium);

        results.push(StrategyResult {
            max_profit: Some(premium),
            max_loss: Some(round_money(breakeven)),
            probability_itm: probability(ctx, quote.strike, config),
            quote: quote.snapshot(),
            ..base_result(
                ctx,
                StrategyKind::CashSecuredPut,
                annual_return,
                Position::CashSecuredPut {
                    strike: quote.strike,
                    premium,
                    collateral: round_money(quote.strike * config.contract_multiplier),
                    protection_pct: round_pct(protection),
                },
                Breakeven::single(round_money(breakeven)),
            )
        });
    }
    results
}

/// OTM calls written against 100 shares bought at spot
pub fn find_covered_calls(
    ctx: &ScanContext,
    view: &ChainView<'_>,
    config: &ScannerConfig,
) -> Vec<StrategyResult> {
    let spot = ctx.spot_price;
    let mut results = Vec::new();

    for quote in view.calls.values() {
        if quote.strike <= spot {
            continue;
        }
        let premium = round_money(quote.price);
        let if_called = pct_of(quote.strike - spot + premium, spot);
        let annual_return = annualize(if_called, ctx.days_to_expiration);
        if !clears_min_return(ctx, annual_return) {
            continue;
        }
        let breakeven = spot - premium;

        results.push(StrategyResult {
            max_profit: Some(round_money(quote.strike - spot + premium)),
            max_loss: Some(round_money(breakeven.max(Decimal::ZERO))),
            probability_itm: probability(ctx, quote.strike, config),
            quote: quote.snapshot(),
            ..base_result(
                ctx,
                StrategyKind::CoveredCall,
                annual_return,
                Position::CoveredCall {
                    strike: quote.strike,
                    premium,
                    if_called_pct: round_pct(if_called),
                    upside_pct: round_pct(pct_of(quote.strike - spot, spot)),
                },
                Breakeven::single(round_money(breakeven)),
            )
        });
    }
    results
}
