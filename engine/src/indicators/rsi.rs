//! RSI (Relative Strength Index) indicator
//!
//! Wilder's formulation: the first average gain and loss are the simple
//! means of the first `period` close-to-close changes, later averages use
//! `avg = (avg * (period - 1) + x) / period`.

use crate::data::Candle;
use crate::indicators::Indicator;
use crate::{EngineError, Result};
use ta::errors::TaError;

/// Value reported while RSI has too little history
pub const NEUTRAL_RSI: f64 = 50.0;

/// RSI indicator over candle closes
#[derive(Debug, Clone)]
pub struct RSI {
    period: usize,
    prev_close: Option<f64>,
    changes: usize,
    gain_sum: f64,
    loss_sum: f64,
    averages: Option<(f64, f64)>,
}

impl RSI {
    /// Create new RSI indicator
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(EngineError::indicator("RSI", TaError::InvalidParameter));
        }
        Ok(Self {
            period,
            prev_close: None,
            changes: 0,
            gain_sum: 0.0,
            loss_sum: 0.0,
            averages: None,
        })
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // Flat history is neutral, an unbroken advance saturates
        return if avg_gain == 0.0 { NEUTRAL_RSI } else { 100.0 };
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

impl Indicator for RSI {
    type Output = f64;

    fn name(&self) -> &str {
        "RSI"
    }

    fn update(&mut self, candle: &Candle) {
        let Some(prev) = self.prev_close.replace(candle.close) else {
            return;
        };
        let change = candle.close - prev;
        let (gain, loss) = (change.max(0.0), (-change).max(0.0));
        let n = self.period as f64;

        self.averages = match self.averages {
            Some((avg_gain, avg_loss)) => Some((
                (avg_gain * (n - 1.0) + gain) / n,
                (avg_loss * (n - 1.0) + loss) / n,
            )),
            None => {
                self.changes += 1;
                self.gain_sum += gain;
                self.loss_sum += loss;
                (self.changes == self.period).then(|| (self.gain_sum / n, self.loss_sum / n))
            }
        };
    }

    fn value(&self) -> Option<f64> {
        self.averages
            .map(|(avg_gain, avg_loss)| rsi_from_averages(avg_gain, avg_loss))
    }

    fn is_ready(&self) -> bool {
        // One price change per period, so period+1 closes
        self.averages.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::calculate;
    use chrono::Utc;

    fn closes(values: &[f64]) -> Vec<Candle> {
        values
            .iter()
            .map(|&c| Candle::new(c, c + 1.0, c - 1.0, c, 1000.0, Utc::now()))
            .collect()
    }

    #[test]
    fn test_rsi_not_ready_before_period() {
        let candles = closes(&[100.0, 102.0, 101.0, 103.0, 105.0, 104.0, 106.0]);
        let series = calculate(RSI::new(14).unwrap(), &candles);
        assert!(series.iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_rising_prices_saturate() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let series = calculate(RSI::new(14).unwrap(), &closes(&values));
        assert!(series[13].is_none());
        assert_eq!(series[14], Some(100.0));
        assert_eq!(series.last().copied().flatten(), Some(100.0));
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        // 20 closes rising by 1, then 5 falling by 2
        let mut values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        values.extend((1..=5).map(|i| 119.0 - 2.0 * i as f64));
        let series = calculate(RSI::new(14).unwrap(), &closes(&values));
        let last = series.last().copied().flatten().unwrap();
        assert!((last - 52.7139).abs() < 1e-3, "rsi = {}", last);
    }

    #[test]
    fn test_rsi_textbook_values() {
        // Wilder's worked example (published as 70.53 with rounded averages)
        let values = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00,
        ];
        let series = calculate(RSI::new(14).unwrap(), &closes(&values));
        let first = series[14].unwrap();
        let second = series[15].unwrap();
        assert!((first - 70.4641).abs() < 1e-3, "rsi = {}", first);
        assert!((second - 66.2496).abs() < 1e-3, "rsi = {}", second);
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let series = calculate(RSI::new(14).unwrap(), &closes(&[100.0; 20]));
        assert_eq!(series.last().copied().flatten(), Some(NEUTRAL_RSI));
    }

    #[test]
    fn test_rsi_zero_period_rejected() {
        assert!(RSI::new(0).is_err());
    }
}
