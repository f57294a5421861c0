//! Engine configuration
//!
//! All constants are static for a run. [`EngineConfig::validate`] is the
//! single gate between loaded settings and a running engine.

pub mod instrument;
pub mod risk;
pub mod strategy;

pub use instrument::*;
pub use risk::*;
pub use strategy::*;

use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Smallest window the indicator set can work with.
pub const MIN_WINDOW_CAPACITY: usize = 20;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum candles retained per instrument
    pub window_capacity: usize,
    /// Below this many candles the engine holds without touching state
    pub min_candles: usize,
    /// Consecutive cycles a new direction must persist before it is accepted
    pub confirmation_threshold: u32,
    /// Accepted signals closer than this to the last trade price are dropped
    pub min_trade_distance: f64,
    pub indicators: IndicatorConfig,
    pub strategy: StrategyConfig,
    pub risk: RiskConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_capacity: 25,
            min_candles: 20,
            confirmation_threshold: 3,
            min_trade_distance: 20.0,
            indicators: IndicatorConfig::default(),
            strategy: StrategyConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Check every constant the engine relies on
    pub fn validate(&self) -> Result<()> {
        if self.window_capacity < MIN_WINDOW_CAPACITY {
            return Err(invalid(format!(
                "window capacity {} is below the minimum of {}",
                self.window_capacity, MIN_WINDOW_CAPACITY
            )));
        }
        if self.min_candles == 0 || self.min_candles > self.window_capacity {
            return Err(invalid(format!(
                "min_candles must be in 1..={}, got {}",
                self.window_capacity, self.min_candles
            )));
        }
        if self.confirmation_threshold == 0 {
            return Err(invalid("confirmation threshold must be at least 1"));
        }
        if !self.min_trade_distance.is_finite() || self.min_trade_distance < 0.0 {
            return Err(invalid(format!(
                "min_trade_distance must be a non-negative number, got {}",
                self.min_trade_distance
            )));
        }

        self.indicators.validate()?;
        self.strategy.validate()?;
        self.risk.validate()?;
        Ok(())
    }
}

pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub(crate) fn invalid(reason: impl Into<String>) -> EngineError {
    EngineError::InvalidConfiguration(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_small_window() {
        let config = EngineConfig {
            window_capacity: 10,
            min_candles: 10,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_min_candles_above_capacity() {
        let config = EngineConfig {
            min_candles: 30,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let config = EngineConfig {
            confirmation_threshold: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_multiplier_bounds() {
        let mut config = EngineConfig::default();
        config.risk.min_multiplier = 6.0;
        assert!(config.validate().is_err());
    }
}
