//! Signal engine orchestration
//!
//! Wires the indicator calculator, structure detector, strategy cascade,
//! risk sizer and state machine into one per-cycle evaluation.

pub mod machine;
pub mod state;

pub use machine::*;
pub use state::*;

use crate::config::EngineConfig;
use crate::data::CandleWindow;
use crate::indicators::{IndicatorCalculator, IndicatorSnapshot};
use crate::risk::{RiskSizer, TickRounder};
use crate::strategy::{SignalDecision, SignalEvaluator, SignalValidator, TrendStrength};
use crate::structure::MarketStructure;
use crate::Result;
use tracing::{debug, warn};

/// Everything the engine derived in one cycle for one instrument
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// `None` when the window was too short to evaluate
    pub snapshot: Option<IndicatorSnapshot>,
    pub structure: MarketStructure,
    /// `None` when the window was too short to evaluate
    pub trend: Option<TrendStrength>,
    pub decision: SignalDecision,
}

/// Stateless over instruments: all per-instrument memory is passed in as
/// [`InstrumentState`], so one engine can serve every instrument concurrently.
pub struct SignalEngine {
    config: EngineConfig,
    calculator: IndicatorCalculator,
    evaluator: SignalEvaluator,
    sizer: RiskSizer,
    machine: SignalStateMachine,
}

impl SignalEngine {
    /// Validate the configuration and build every component
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let calculator = IndicatorCalculator::new(config.indicators.clone())?;
        let rounder = TickRounder::new(config.risk.tick_sizes.clone());
        let evaluator = SignalEvaluator::new(&config.strategy, rounder);
        let sizer = RiskSizer::new(config.risk.clone());
        let machine =
            SignalStateMachine::new(config.confirmation_threshold, config.min_trade_distance);

        Ok(Self {
            config,
            calculator,
            evaluator,
            sizer,
            machine,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// One polling cycle for one instrument.
    ///
    /// A window shorter than `min_candles` yields HOLD and leaves `state` untouched.
    pub fn evaluate(
        &self,
        instrument: &str,
        window: &CandleWindow,
        state: &mut InstrumentState,
    ) -> Evaluation {
        let structure = MarketStructure::detect(window);
        if window.len() < self.config.min_candles {
            debug!(
                "{}: {} of {} candles, holding",
                instrument,
                window.len(),
                self.config.min_candles
            );
            return Evaluation {
                snapshot: None,
                structure,
                trend: None,
                decision: SignalDecision::hold(format!(
                    "insufficient data: {} of {} candles",
                    window.len(),
                    self.config.min_candles
                )),
            };
        }

        match self.calculator.compute(window) {
            Some(snapshot) => self.evaluate_snapshot(instrument, &snapshot, structure, state),
            None => Evaluation {
                snapshot: None,
                structure,
                trend: None,
                decision: SignalDecision::hold("empty window"),
            },
        }
    }

    /// Decide from an already computed snapshot
    pub fn evaluate_snapshot(
        &self,
        instrument: &str,
        snapshot: &IndicatorSnapshot,
        structure: MarketStructure,
        state: &mut InstrumentState,
    ) -> Evaluation {
        let trend = TrendStrength::assess(instrument, snapshot, &self.config.strategy.weak_trend_gaps);
        let candidate = self.candidate(instrument, snapshot, structure);
        let decision = self.machine.apply(instrument, state, &candidate);

        Evaluation {
            snapshot: Some(*snapshot),
            structure,
            trend: Some(trend),
            decision,
        }
    }

    /// Raw signal from the cascade, sized and validated; HOLD when anything is off
    fn candidate(
        &self,
        instrument: &str,
        snapshot: &IndicatorSnapshot,
        structure: MarketStructure,
    ) -> SignalDecision {
        let raw = self.evaluator.evaluate(instrument, snapshot, structure);
        let Some(entry) = raw.entry_price else {
            return SignalDecision::hold(raw.reason);
        };
        let Some(bracket) = self
            .sizer
            .size(raw.direction, entry, snapshot.atr, snapshot.atr_mean)
        else {
            return SignalDecision::hold(raw.reason);
        };

        let decision = SignalDecision::sized(raw.direction, entry, &bracket, raw.reason);
        if SignalValidator::validate(&decision) {
            decision
        } else {
            warn!(
                "{}: discarding malformed {} (ATR {:.2})",
                instrument, decision, snapshot.atr
            );
            SignalDecision::hold("invalid bracket")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Candle;
    use crate::strategy::Direction;
    use chrono::Utc;

    fn snapshot() -> IndicatorSnapshot {
        crate::strategy::test_support::snapshot()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            confirmation_threshold: 0,
            ..Default::default()
        };
        assert!(SignalEngine::new(config).is_err());
    }

    #[test]
    fn test_short_window_holds_without_state_change() {
        let engine = SignalEngine::new(EngineConfig::default()).unwrap();
        let window = CandleWindow::from_candles(
            25,
            (0..5).map(|i| Candle::new(100.0, 101.0, 99.0, 100.0 + i as f64, 10.0, Utc::now())),
        );
        let mut state = InstrumentState {
            last_signal: Direction::Sell,
            confirmation_counter: 2,
            last_trade_price: Some(90.0),
        };
        let before = state.clone();

        let evaluation = engine.evaluate("NSE:NIFTY 50", &window, &mut state);
        assert_eq!(evaluation.decision.direction, Direction::Hold);
        assert!(evaluation.snapshot.is_none());
        assert!(evaluation.decision.reason.contains("insufficient data"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_zero_atr_never_trades() {
        let engine = SignalEngine::new(EngineConfig::default()).unwrap();
        let s = IndicatorSnapshot {
            atr: 0.0,
            vwap: 24_850.0,
            ..snapshot()
        };
        let mut state = InstrumentState {
            last_signal: Direction::Buy,
            ..Default::default()
        };
        let evaluation =
            engine.evaluate_snapshot("NSE:NIFTY 50", &s, MarketStructure::NoChange, &mut state);
        assert_eq!(evaluation.decision.direction, Direction::Hold);
        assert!(!state.has_traded());
    }

    #[test]
    fn test_reports_trend_strength() {
        let engine = SignalEngine::new(EngineConfig::default()).unwrap();
        let mut state = InstrumentState::default();
        let evaluation = engine.evaluate_snapshot(
            "NSE:NIFTY BANK",
            &snapshot(),
            MarketStructure::NoChange,
            &mut state,
        );
        // EMA gap of 60 clears BANK's 27.5
        assert_eq!(evaluation.trend.map(|t| t.is_weak()), Some(false));
    }
}
