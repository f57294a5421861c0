//! Indicator and strategy configuration

use crate::config::{invalid, is_positive, InstrumentTable};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Indicator window lengths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub ema_short_period: usize,
    pub ema_long_period: usize,
    pub atr_period: usize,
    pub macd_fast_period: usize,
    pub macd_slow_period: usize,
    pub macd_signal_period: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub stochastic_period: usize,
    /// Rolling window for the volume mean used by VWAP confirmation
    pub volume_mean_period: usize,
    /// Rolling window for the ATR mean used by the risk sizer
    pub atr_mean_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_short_period: 9,
            ema_long_period: 21,
            atr_period: 14,
            macd_fast_period: 12,
            macd_slow_period: 26,
            macd_signal_period: 9,
            bb_period: 20,
            bb_std_dev: 2.0,
            stochastic_period: 14,
            volume_mean_period: 5,
            atr_mean_period: 20,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("ema_short_period", self.ema_short_period),
            ("ema_long_period", self.ema_long_period),
            ("atr_period", self.atr_period),
            ("macd_fast_period", self.macd_fast_period),
            ("macd_slow_period", self.macd_slow_period),
            ("macd_signal_period", self.macd_signal_period),
            ("bb_period", self.bb_period),
            ("stochastic_period", self.stochastic_period),
            ("volume_mean_period", self.volume_mean_period),
            ("atr_mean_period", self.atr_mean_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(invalid(format!("{} must be greater than zero", name)));
        }
        if self.macd_fast_period >= self.macd_slow_period {
            return Err(invalid(format!(
                "macd_fast_period ({}) must be below macd_slow_period ({})",
                self.macd_fast_period, self.macd_slow_period
            )));
        }
        if !is_positive(self.bb_std_dev) {
            return Err(invalid("bb_std_dev must be positive"));
        }
        Ok(())
    }
}

/// Whether break-of-structure must agree with a proposed direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructurePolicy {
    /// Structure is reported but never blocks a signal
    #[default]
    Advisory,
    /// BUY needs a bullish break, SELL a bearish break
    RequireConfirmation,
}

impl FromStr for StructurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advisory" | "off" => Ok(Self::Advisory),
            "require" | "required" | "require_confirmation" => Ok(Self::RequireConfirmation),
            other => Err(format!("unknown structure policy: {}", other)),
        }
    }
}

impl fmt::Display for StructurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advisory => write!(f, "advisory"),
            Self::RequireConfirmation => write!(f, "require"),
        }
    }
}

/// Strategy cascade thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Trend-following BUY needs RSI above this
    pub trend_rsi_buy: f64,
    /// Trend-following SELL needs RSI below this
    pub trend_rsi_sell: f64,
    pub stochastic_oversold: f64,
    pub stochastic_overbought: f64,
    /// Mean-reversion BUY needs RSI below this
    pub reversion_rsi_oversold: f64,
    /// Mean-reversion SELL needs RSI above this
    pub reversion_rsi_overbought: f64,
    /// Distance from VWAP, in ATRs, beyond which any entry is vetoed
    pub liquidity_trap_atr_multiple: f64,
    pub structure_policy: StructurePolicy,
    /// Minimum |EMA_short - EMA_long| below which the trend is reported weak
    pub weak_trend_gaps: InstrumentTable,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            trend_rsi_buy: 55.0,
            trend_rsi_sell: 45.0,
            stochastic_oversold: 20.0,
            stochastic_overbought: 80.0,
            reversion_rsi_oversold: 30.0,
            reversion_rsi_overbought: 70.0,
            liquidity_trap_atr_multiple: 1.5,
            structure_policy: StructurePolicy::Advisory,
            weak_trend_gaps: InstrumentTable::new(27.5).with_rule("NIFTY 50", 8.5),
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<()> {
        let oscillators = [
            ("trend_rsi_buy", self.trend_rsi_buy),
            ("trend_rsi_sell", self.trend_rsi_sell),
            ("stochastic_oversold", self.stochastic_oversold),
            ("stochastic_overbought", self.stochastic_overbought),
            ("reversion_rsi_oversold", self.reversion_rsi_oversold),
            ("reversion_rsi_overbought", self.reversion_rsi_overbought),
        ];
        for (name, value) in oscillators {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(format!("{} must be within 0..=100, got {}", name, value)));
            }
        }
        if !is_positive(self.liquidity_trap_atr_multiple) {
            return Err(invalid("liquidity_trap_atr_multiple must be positive"));
        }
        self.weak_trend_gaps
            .validate_non_negative()
            .map_err(|e| invalid(format!("weak_trend_gaps: {}", e)))?;
        Ok(())
    }
}
