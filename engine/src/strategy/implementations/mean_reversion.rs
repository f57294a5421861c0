//! Bollinger mean-reversion strategy

use crate::config::StrategyConfig;
use crate::indicators::IndicatorSnapshot;
use crate::strategy::{Direction, Strategy};

/// Fades band touches when RSI is stretched.
///
/// BUY at or below the lower band with RSI under `rsi_oversold`; SELL at
/// or above the upper band with RSI over `rsi_overbought`.
#[derive(Debug, Clone)]
pub struct MeanReversionStrategy {
    rsi_oversold: f64,
    rsi_overbought: f64,
}

impl MeanReversionStrategy {
    pub fn new(rsi_oversold: f64, rsi_overbought: f64) -> Self {
        Self {
            rsi_oversold,
            rsi_overbought,
        }
    }
}

impl Default for MeanReversionStrategy {
    fn default() -> Self {
        Self::from(&StrategyConfig::default())
    }
}

impl From<&StrategyConfig> for MeanReversionStrategy {
    fn from(config: &StrategyConfig) -> Self {
        Self::new(config.reversion_rsi_oversold, config.reversion_rsi_overbought)
    }
}

impl Strategy for MeanReversionStrategy {
    fn name(&self) -> &str {
        "Mean Reversion"
    }

    fn evaluate(&self, s: &IndicatorSnapshot) -> Option<Direction> {
        if s.close <= s.bb_lower && s.rsi < self.rsi_oversold {
            Some(Direction::Buy)
        } else if s.close >= s.bb_upper && s.rsi > self.rsi_overbought {
            Some(Direction::Sell)
        } else {
            None
        }
    }
}
