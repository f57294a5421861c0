//! Risk sizing configuration

use crate::config::{invalid, is_positive, InstrumentTable};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Adaptive ATR stop / target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Stop multiplier when ATR equals its rolling mean
    pub base_multiplier: f64,
    /// How strongly the stop multiplier follows the ATR ratio
    pub ratio_sensitivity: f64,
    /// Lower clamp for the stop multiplier
    pub min_multiplier: f64,
    /// Upper clamp for the stop multiplier
    pub max_multiplier: f64,
    /// Fixed ATR multiple for the profit target
    pub reward_multiplier: f64,
    /// Never place the target closer to entry than the stop
    pub enforce_reward_floor: bool,
    /// Entry rounding granularity per instrument
    pub tick_sizes: InstrumentTable,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            base_multiplier: 3.0,
            ratio_sensitivity: 2.0,
            min_multiplier: 2.5,
            max_multiplier: 5.5,
            reward_multiplier: 3.5,
            enforce_reward_floor: true,
            tick_sizes: InstrumentTable::new(50.0).with_rule("BANK", 100.0),
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.min_multiplier)
            || self.max_multiplier.is_nan()
            || self.max_multiplier < self.min_multiplier
        {
            return Err(invalid(format!(
                "ATR multiplier bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_multiplier, self.max_multiplier
            )));
        }
        if !is_positive(self.reward_multiplier) {
            return Err(invalid("reward_multiplier must be positive"));
        }
        if !self.base_multiplier.is_finite() || !self.ratio_sensitivity.is_finite() {
            return Err(invalid("base_multiplier and ratio_sensitivity must be finite"));
        }
        self.tick_sizes
            .validate_positive()
            .map_err(|e| invalid(format!("tick_sizes: {}", e)))?;
        Ok(())
    }
}
