//! MACD (Moving Average Convergence Divergence) indicator
//!
//! Fast and slow EMAs run from the first close. The signal EMA only starts
//! once the slow EMA has `slow_period` closes behind it, seeded with the
//! first defined MACD line value.

use crate::data::Candle;
use crate::indicators::Indicator;
use crate::{EngineError, Result};
use ta::errors::TaError;
use ta::indicators::ExponentialMovingAverage;
use ta::Next;

/// MACD histogram over candle closes
#[derive(Debug, Clone)]
pub struct MACD {
    fast: ExponentialMovingAverage,
    slow: ExponentialMovingAverage,
    signal: ExponentialMovingAverage,
    slow_period: usize,
    signal_period: usize,
    update_count: usize,
    signal_count: usize,
    histogram: Option<f64>,
}

impl MACD {
    /// Create new MACD indicator
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Result<Self> {
        if fast_period >= slow_period {
            return Err(EngineError::indicator("MACD", TaError::InvalidParameter));
        }
        let ema = |period| {
            ExponentialMovingAverage::new(period).map_err(|e| EngineError::indicator("MACD", e))
        };
        Ok(Self {
            fast: ema(fast_period)?,
            slow: ema(slow_period)?,
            signal: ema(signal_period)?,
            slow_period,
            signal_period,
            update_count: 0,
            signal_count: 0,
            histogram: None,
        })
    }
}

impl Indicator for MACD {
    /// The histogram, which is what the strategies compare against zero
    type Output = f64;

    fn name(&self) -> &str {
        "MACD"
    }

    fn update(&mut self, candle: &Candle) {
        let fast = self.fast.next(candle.close);
        let slow = self.slow.next(candle.close);
        self.update_count += 1;
        if self.update_count < self.slow_period {
            return;
        }

        let line = fast - slow;
        let signal = self.signal.next(line);
        self.signal_count += 1;
        if self.is_ready() {
            self.histogram = Some(line - signal);
        }
    }

    fn value(&self) -> Option<f64> {
        self.histogram
    }

    fn is_ready(&self) -> bool {
        self.signal_count >= self.signal_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::calculate;
    use chrono::Utc;

    fn closes(values: impl IntoIterator<Item = f64>) -> Vec<Candle> {
        values
            .into_iter()
            .map(|c| Candle::new(c, c, c, c, 1.0, Utc::now()))
            .collect()
    }

    #[test]
    fn test_macd_readiness() {
        let candles = closes((0..50).map(|i| 100.0 + i as f64 * 0.1));
        let series = calculate(MACD::new(12, 26, 9).unwrap(), &candles);
        assert!(series[32].is_none());
        assert!(series[33].is_some());
    }

    #[test]
    fn test_macd_signal_seeded_from_first_line_value() {
        // Half-point drift with a 3 point bump every fourth close
        let candles = closes((0..40).map(|i| {
            let bump = if i % 4 == 0 { 3.0 } else { 0.0 };
            100.0 + 0.5 * i as f64 + bump
        }));
        let series = calculate(MACD::new(12, 26, 9).unwrap(), &candles);
        let first = series[33].unwrap();
        let last = series[39].unwrap();
        assert!((first - 0.208329).abs() < 1e-5, "histogram = {}", first);
        assert!((last - 0.086512).abs() < 1e-5, "histogram = {}", last);
    }

    #[test]
    fn test_macd_flat_series_is_zero() {
        let series = calculate(MACD::new(12, 26, 9).unwrap(), &closes([100.0; 40]));
        assert_eq!(series.last().copied().flatten(), Some(0.0));
    }

    #[test]
    fn test_macd_rejects_inverted_periods() {
        assert!(MACD::new(26, 12, 9).is_err());
    }
}
