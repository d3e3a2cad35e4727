//! Strategy detectors
//!
//! Each detector is a pure function over one scan context and the chain
//! sides it declares in [`CATALOG`]. The scanner walks the catalog in order
//! and hands every detector a [`ChainView`] that exposes only those sides.

mod single;
mod spreads;
mod volatility;

use rust_decimal::Decimal;

use crate::chain::{Chain, OptionQuote, StrikeMap};
use crate::config::ScannerConfig;
use crate::metrics::{probability_itm_heuristic, round_pct};
use crate::types::{Breakeven, Position, ScanContext, StrategyKind, StrategyResult};

pub use single::{
    find_cash_secured_puts, find_covered_calls, find_long_calls, find_long_puts,
    find_short_calls, find_short_puts,
};
pub use spreads::{find_bear_put_spreads, find_bull_call_spreads, find_credit_spreads};
pub use volatility::{find_iron_condors, find_straddles, find_strangles};

static NO_QUOTES: StrikeMap = StrikeMap::new();

/// Which sides of the chain a detector reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainSides {
    Calls,
    Puts,
    Both,
}

/// Read-only view of a chain restricted to the declared sides
#[derive(Debug, Clone, Copy)]
pub struct ChainView<'a> {
    pub calls: &'a StrikeMap,
    pub puts: &'a StrikeMap,
}

impl<'a> ChainView<'a> {
    pub fn new(chain: &'a Chain, sides: ChainSides) -> Self {
        match sides {
            ChainSides::Calls => Self {
                calls: chain.calls(),
                puts: &NO_QUOTES,
            },
            ChainSides::Puts => Self {
                calls: &NO_QUOTES,
                puts: chain.puts(),
            },
            ChainSides::Both => Self {
                calls: chain.calls(),
                puts: chain.puts(),
            },
        }
    }
}

pub type DetectFn = fn(&ScanContext, &ChainView<'_>, &ScannerConfig) -> Vec<StrategyResult>;

/// One catalog row: a strategy, its inputs, and its search algorithm
#[derive(Clone, Copy)]
pub struct DetectorEntry {
    pub strategy: StrategyKind,
    pub sides: ChainSides,
    pub detect: DetectFn,
}

impl DetectorEntry {
    pub fn run(&self, ctx: &ScanContext, chain: &Chain, config: &ScannerConfig) -> Vec<StrategyResult> {
        (self.detect)(ctx, &ChainView::new(chain, self.sides), config)
    }
}

/// Fixed detector order; ties in the final ranking keep this order
pub static CATALOG: [DetectorEntry; 12] = [
    DetectorEntry {
        strategy: StrategyKind::LongCall,
        sides: ChainSides::Calls,
        detect: find_long_calls,
    },
    DetectorEntry {
        strategy: StrategyKind::LongPut,
        sides: ChainSides::Puts,
        detect: find_long_puts,
    },
    DetectorEntry {
        strategy: StrategyKind::ShortCall,
        sides: ChainSides::Calls,
        detect: find_short_calls,
    },
    DetectorEntry {
        strategy: StrategyKind::ShortPut,
        sides: ChainSides::Puts,
        detect: find_short_puts,
    },
    DetectorEntry {
        strategy: StrategyKind::BullCallSpread,
        sides: ChainSides::Calls,
        detect: find_bull_call_spreads,
    },
    DetectorEntry {
        strategy: StrategyKind::BearPutSpread,
        sides: ChainSides::Puts,
        detect: find_bear_put_spreads,
    },
    DetectorEntry {
        strategy: StrategyKind::CashSecuredPut,
        sides: ChainSides::Puts,
        detect: find_cash_secured_puts,
    },
    DetectorEntry {
        strategy: StrategyKind::CoveredCall,
        sides: ChainSides::Calls,
        detect: find_covered_calls,
    },
    DetectorEntry {
        strategy: StrategyKind::LongStraddle,
        sides: ChainSides::Both,
        detect: find_straddles,
    },
    DetectorEntry {
        strategy: StrategyKind::LongStrangle,
        sides: ChainSides::Both,
        detect: find_strangles,
    },
    DetectorEntry {
        strategy: StrategyKind::IronCondor,
        sides: ChainSides::Both,
        detect: find_iron_condors,
    },
    DetectorEntry {
        strategy: StrategyKind::CreditSpread,
        sides: ChainSides::Both,
        detect: find_credit_spreads,
    },
];

// ============================================================================
// Shared helpers
// ============================================================================

/// Result skeleton with the common fields filled in
fn base_result(
    ctx: &ScanContext,
    strategy: StrategyKind,
    return_pct: Decimal,
    position: Position,
    breakeven: Breakeven,
) -> StrategyResult {
    StrategyResult {
        ticker: ctx.ticker.clone(),
        strategy,
        expiration: ctx.expiration,
        dte: ctx.days_to_expiration,
        spot_price: ctx.spot_price,
        return_pct: round_pct(return_pct),
        position,
        breakeven,
        max_profit: None,
        max_loss: None,
        probability_itm: None,
        quote: None,
    }
}

/// Gate on the return as it will be stored
fn clears_min_return(ctx: &ScanContext, return_pct: Decimal) -> bool {
    round_pct(return_pct) >= ctx.min_return_pct
}

fn probability(ctx: &ScanContext, strike: Decimal, config: &ScannerConfig) -> Option<Decimal> {
    Some(probability_itm_heuristic(
        ctx.spot_price,
        strike,
        ctx.days_to_expiration,
        &config.probability,
    ))
}

fn ascending(side: &StrikeMap) -> Vec<&OptionQuote> {
    side.values().collect()
}

fn descending(side: &StrikeMap) -> Vec<&OptionQuote> {
    side.values().rev().collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_catalog_covers_every_strategy_once() {
        for kind in StrategyKind::all() {
            let count = CATALOG.iter().filter(|e| e.strategy == *kind).count();
            assert_eq!(count, 1, "{kind} should appear exactly once");
        }
    }

    #[test]
    fn test_view_hides_undeclared_side() {
        let chain = make_chain(&[(dec!(100), dec!(3))], &[(dec!(100), dec!(3))]);
        let calls_only = ChainView::new(&chain, ChainSides::Calls);
        assert_eq!(calls_only.calls.len(), 1);
        assert!(calls_only.puts.is_empty());

        let both = ChainView::new(&chain, ChainSides::Both);
        assert_eq!(both.puts.len(), 1);
    }

    #[test]
    fn test_detectors_emit_only_their_strategy() {
        let chain = make_chain(
            &[
                (dec!(95), dec!(7)),
                (dec!(100), dec!(3)),
                (dec!(105), dec!(1)),
                (dec!(110), dec!(0.5)),
                (dec!(115), dec!(0.2)),
            ],
            &[
                (dec!(85), dec!(0.2)),
                (dec!(90), dec!(0.6)),
                (dec!(95), dec!(1.2)),
                (dec!(100), dec!(3)),
                (dec!(105), dec!(7)),
            ],
        );
        let ctx = ctx(dec!(100), 30, Decimal::ZERO);
        let config = ScannerConfig::default();
        for entry in CATALOG.iter() {
            for result in entry.run(&ctx, &chain, &config) {
                assert_eq!(result.strategy, entry.strategy);
                assert_eq!(result.ticker, "TEST");
            }
        }
    }

    #[test]
    fn test_empty_chain_yields_nothing() {
        let chain = Chain::default();
        let ctx = default_ctx();
        let config = ScannerConfig::default();
        for entry in CATALOG.iter() {
            assert!(entry.run(&ctx, &chain, &config).is_empty());
        }
    }
}
