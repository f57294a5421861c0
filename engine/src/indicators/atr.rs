//! ATR (Average True Range) indicator
//!
//! Seeded with the mean of the first `period` true ranges (the first candle
//! contributes high - low), then Wilder-smoothed.

use crate::data::Candle;
use crate::indicators::Indicator;
use crate::{EngineError, Result};
use ta::errors::TaError;

/// ATR indicator over full candles
#[derive(Debug, Clone)]
pub struct ATR {
    period: usize,
    prev_close: Option<f64>,
    seen: usize,
    tr_sum: f64,
    current: Option<f64>,
}

impl ATR {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(EngineError::indicator("ATR", TaError::InvalidParameter));
        }
        Ok(Self {
            period,
            prev_close: None,
            seen: 0,
            tr_sum: 0.0,
            current: None,
        })
    }
}

impl Indicator for ATR {
    type Output = f64;

    fn name(&self) -> &str {
        "ATR"
    }

    fn update(&mut self, candle: &Candle) {
        let tr = candle.true_range(self.prev_close);
        self.prev_close = Some(candle.close);
        let n = self.period as f64;

        self.current = match self.current {
            Some(atr) => Some((atr * (n - 1.0) + tr) / n),
            None => {
                self.seen += 1;
                self.tr_sum += tr;
                (self.seen == self.period).then(|| self.tr_sum / n)
            }
        };
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}

/// Plain mean of true ranges, for windows shorter than the ATR period
pub fn mean_true_range<'a>(candles: impl IntoIterator<Item = &'a Candle>) -> Option<f64> {
    let mut prev_close = None;
    let mut total = 0.0;
    let mut count = 0usize;
    for candle in candles {
        total += candle.true_range(prev_close);
        prev_close = Some(candle.close);
        count += 1;
    }
    (count > 0).then(|| total / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::calculate;
    use chrono::Utc;

    #[test]
    fn test_atr_constant_range() {
        let candles: Vec<Candle> = (0..20)
            .map(|_| Candle::new(100.0, 105.0, 95.0, 100.0, 1.0, Utc::now()))
            .collect();
        let series = calculate(ATR::new(14).unwrap(), &candles);
        assert!(series[12].is_none());
        let atr = series.last().copied().flatten().unwrap();
        assert!((atr - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_atr_wilder_smoothing() {
        // 14 candles of range 10 seed the average, then 6 of range 60
        let candles: Vec<Candle> = (0..20)
            .map(|i| {
                let half = if i < 14 { 5.0 } else { 30.0 };
                Candle::new(100.0, 100.0 + half, 100.0 - half, 100.0, 1.0, Utc::now())
            })
            .collect();
        let series = calculate(ATR::new(14).unwrap(), &candles);
        assert_eq!(series[13], Some(10.0));
        let atr = series.last().copied().flatten().unwrap();
        assert!((atr - 27.9475).abs() < 1e-3, "atr = {}", atr);
    }

    #[test]
    fn test_atr_zero_period_rejected() {
        assert!(ATR::new(0).is_err());
    }

    #[test]
    fn test_mean_true_range() {
        let candles = vec![
            Candle::new(100.0, 102.0, 98.0, 100.0, 1.0, Utc::now()),
            Candle::new(100.0, 101.0, 99.0, 100.0, 1.0, Utc::now()),
        ];
        assert_eq!(mean_true_range(&candles), Some(3.0));
        assert_eq!(mean_true_range(&Vec::<Candle>::new()), None);
    }
}
