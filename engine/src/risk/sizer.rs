//! Adaptive ATR risk sizing

use crate::config::RiskConfig;
use crate::strategy::Direction;
use serde::{Deserialize, Serialize};

/// Stop-loss and profit target around an entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub stop_loss: f64,
    pub profit_target: f64,
    /// ATR multiple used for the stop
    pub atr_multiplier: f64,
    /// ATR multiple used for the target
    pub reward_multiplier: f64,
}

/// Converts ATR into a stop / target pair
#[derive(Debug, Clone)]
pub struct RiskSizer {
    config: RiskConfig,
}

impl RiskSizer {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Stop multiplier for the current volatility regime.
    ///
    /// `3 + (ATR / mean_ATR - 1) * 2`, clamped to the configured bounds. A
    /// zero or undefined mean counts as a ratio of 1.
    pub fn atr_multiplier(&self, atr: f64, atr_mean: f64) -> f64 {
        let ratio = if atr_mean > 0.0 && atr_mean.is_finite() && atr.is_finite() {
            atr / atr_mean
        } else {
            1.0
        };
        let raw = self.config.base_multiplier + (ratio - 1.0) * self.config.ratio_sensitivity;
        raw.clamp(self.config.min_multiplier, self.config.max_multiplier)
    }

    /// Target multiple, floored at the stop multiple when configured
    pub fn reward_multiplier(&self, atr_multiplier: f64) -> f64 {
        if self.config.enforce_reward_floor {
            self.config.reward_multiplier.max(atr_multiplier)
        } else {
            self.config.reward_multiplier
        }
    }

    /// Size a bracket around an already-rounded entry; `None` for HOLD
    pub fn size(&self, direction: Direction, entry: f64, atr: f64, atr_mean: f64) -> Option<Bracket> {
        let side = match direction {
            Direction::Buy => 1.0,
            Direction::Sell => -1.0,
            Direction::Hold => return None,
        };
        let atr_multiplier = self.atr_multiplier(atr, atr_mean);
        let reward_multiplier = self.reward_multiplier(atr_multiplier);

        Some(Bracket {
            stop_loss: entry - side * atr_multiplier * atr,
            profit_target: entry + side * reward_multiplier * atr,
            atr_multiplier,
            reward_multiplier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizer() -> RiskSizer {
        RiskSizer::new(RiskConfig::default())
    }

    #[test]
    fn test_multiplier_at_mean_is_base() {
        assert_eq!(sizer().atr_multiplier(120.0, 120.0), 3.0);
    }

    #[test]
    fn test_multiplier_widens_and_clamps() {
        let s = sizer();
        assert_eq!(s.atr_multiplier(150.0, 100.0), 4.0);
        assert_eq!(s.atr_multiplier(1000.0, 100.0), 5.5);
        assert_eq!(s.atr_multiplier(10.0, 100.0), 2.5);
        assert!((s.atr_multiplier(80.0, 100.0) - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_zero_mean_counts_as_ratio_one() {
        assert_eq!(sizer().atr_multiplier(120.0, 0.0), 3.0);
    }

    #[test]
    fn test_buy_bracket() {
        let bracket = sizer().size(Direction::Buy, 24_850.0, 120.0, 120.0).unwrap();
        assert_eq!(bracket.stop_loss, 24_850.0 - 3.0 * 120.0);
        assert_eq!(bracket.profit_target, 24_850.0 + 3.5 * 120.0);
    }

    #[test]
    fn test_sell_bracket_mirrors() {
        let bracket = sizer().size(Direction::Sell, 1_000.0, 10.0, 10.0).unwrap();
        assert_eq!(bracket.stop_loss, 1_030.0);
        assert_eq!(bracket.profit_target, 965.0);
    }

    #[test]
    fn test_hold_has_no_bracket() {
        assert!(sizer().size(Direction::Hold, 1_000.0, 10.0, 10.0).is_none());
    }

    #[test]
    fn test_reward_floor() {
        // Ratio 2.0 gives a 5.0 stop multiple, above the 3.5 reward multiple
        let floored = sizer().size(Direction::Buy, 1_000.0, 20.0, 10.0).unwrap();
        assert_eq!(floored.atr_multiplier, 5.0);
        assert_eq!(floored.reward_multiplier, 5.0);
        assert!(floored.profit_target - 1_000.0 >= 1_000.0 - floored.stop_loss);

        let literal = RiskSizer::new(RiskConfig {
            enforce_reward_floor: false,
            ..Default::default()
        })
        .size(Direction::Buy, 1_000.0, 20.0, 10.0)
        .unwrap();
        assert_eq!(literal.reward_multiplier, 3.5);
        assert!(literal.profit_target - 1_000.0 < 1_000.0 - literal.stop_loss);
    }
}
