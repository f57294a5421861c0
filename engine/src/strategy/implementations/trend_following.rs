//! Trend-following pullback strategy

use crate::config::StrategyConfig;
use crate::indicators::IndicatorSnapshot;
use crate::strategy::{Direction, Strategy};

/// Trend-following thresholds
#[derive(Debug, Clone)]
pub struct TrendFollowingConfig {
    pub rsi_buy: f64,
    pub rsi_sell: f64,
    pub stochastic_oversold: f64,
    pub stochastic_overbought: f64,
}

impl Default for TrendFollowingConfig {
    fn default() -> Self {
        Self::from(&StrategyConfig::default())
    }
}

impl From<&StrategyConfig> for TrendFollowingConfig {
    fn from(config: &StrategyConfig) -> Self {
        Self {
            rsi_buy: config.trend_rsi_buy,
            rsi_sell: config.trend_rsi_sell,
            stochastic_oversold: config.stochastic_oversold,
            stochastic_overbought: config.stochastic_overbought,
        }
    }
}

/// Buys oversold pullbacks inside an uptrend and sells overbought rallies
/// inside a downtrend.
///
/// BUY: RSI above `rsi_buy`, positive MACD histogram, close above the slow
/// EMA and %K below `stochastic_oversold`. SELL mirrors every condition.
#[derive(Debug, Clone, Default)]
pub struct TrendFollowingStrategy {
    config: TrendFollowingConfig,
}

impl TrendFollowingStrategy {
    pub fn new(config: TrendFollowingConfig) -> Self {
        Self { config }
    }
}

impl Strategy for TrendFollowingStrategy {
    fn name(&self) -> &str {
        "Trend Following"
    }

    fn evaluate(&self, s: &IndicatorSnapshot) -> Option<Direction> {
        let c = &self.config;
        if s.rsi > c.rsi_buy
            && s.macd_diff > 0.0
            && s.close > s.ema_long
            && s.stochastic_k < c.stochastic_oversold
        {
            Some(Direction::Buy)
        } else if s.rsi < c.rsi_sell
            && s.macd_diff < 0.0
            && s.close < s.ema_long
            && s.stochastic_k > c.stochastic_overbought
        {
            Some(Direction::Sell)
        } else {
            None
        }
    }
}
