//! Strategy cascade evaluation

use crate::config::{StrategyConfig, StructurePolicy};
use crate::indicators::IndicatorSnapshot;
use crate::risk::TickRounder;
use crate::strategy::{
    Direction, MeanReversionStrategy, RawSignal, Strategy, TrendFollowingConfig,
    TrendFollowingStrategy, VwapConfirmationStrategy,
};
use crate::structure::MarketStructure;
use tracing::debug;

/// Runs the ordered strategy cascade and the entry filters over one snapshot.
///
/// Stages, in order:
/// 1. The first strategy that fires proposes a direction.
/// 2. Liquidity-trap veto: close further than `k * ATR` from VWAP forces HOLD.
/// 3. Structure gate, only under [`StructurePolicy::RequireConfirmation`].
/// 4. The entry is the close rounded to the instrument tick.
pub struct SignalEvaluator {
    strategies: Vec<Box<dyn Strategy>>,
    liquidity_trap_atr_multiple: f64,
    structure_policy: StructurePolicy,
    rounder: TickRounder,
}

impl SignalEvaluator {
    /// Default cascade: trend following, then VWAP confirmation, then mean reversion
    pub fn new(config: &StrategyConfig, rounder: TickRounder) -> Self {
        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(TrendFollowingStrategy::new(TrendFollowingConfig::from(config))),
            Box::new(VwapConfirmationStrategy),
            Box::new(MeanReversionStrategy::from(config)),
        ];
        Self::with_strategies(strategies, config, rounder)
    }

    /// Custom cascade; earlier strategies take precedence
    pub fn with_strategies(
        strategies: Vec<Box<dyn Strategy>>,
        config: &StrategyConfig,
        rounder: TickRounder,
    ) -> Self {
        Self {
            strategies,
            liquidity_trap_atr_multiple: config.liquidity_trap_atr_multiple,
            structure_policy: config.structure_policy,
            rounder,
        }
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn evaluate(
        &self,
        instrument: &str,
        snapshot: &IndicatorSnapshot,
        structure: MarketStructure,
    ) -> RawSignal {
        let Some((strategy, direction)) = self
            .strategies
            .iter()
            .find_map(|s| s.evaluate(snapshot).map(|d| (s.name(), d)))
        else {
            return RawSignal::hold("no strategy fired");
        };

        let vwap_distance = (snapshot.close - snapshot.vwap).abs();
        let trap_limit = self.liquidity_trap_atr_multiple * snapshot.atr;
        if vwap_distance > trap_limit {
            debug!(
                "{}: {} {} vetoed, close {:.2} is {:.2} from VWAP (limit {:.2})",
                instrument, strategy, direction, snapshot.close, vwap_distance, trap_limit
            );
            return RawSignal::hold(format!(
                "liquidity trap: close {:.2} from VWAP exceeds {:.2}",
                vwap_distance, trap_limit
            ));
        }

        if self.structure_policy == StructurePolicy::RequireConfirmation
            && !structure_confirms(direction, structure)
        {
            debug!(
                "{}: {} {} blocked by structure {}",
                instrument, strategy, direction, structure
            );
            return RawSignal::hold(format!("{} not confirmed by structure {}", direction, structure));
        }

        RawSignal {
            direction,
            entry_price: Some(self.rounder.round(instrument, snapshot.close)),
            strategy: Some(strategy.to_string()),
            reason: format!("{} {}", strategy, direction),
        }
    }
}

fn structure_confirms(direction: Direction, structure: MarketStructure) -> bool {
    matches!(
        (direction, structure),
        (Direction::Buy, MarketStructure::BullishBos) | (Direction::Sell, MarketStructure::BearishBos)
    )
}
