//! Technical indicators module
//!
//! Provides technical analysis indicators using the `ta` crate, plus the
//! [`IndicatorCalculator`] that folds a whole window into an
//! [`IndicatorSnapshot`].

pub mod atr;
pub mod bb;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod snapshot;
pub mod stochastic;
pub mod vwap;

pub use atr::*;
pub use bb::*;
pub use ema::*;
pub use macd::*;
pub use rsi::*;
pub use sma::*;
pub use snapshot::*;
pub use stochastic::*;
pub use vwap::*;

use crate::data::Candle;

/// Indicator trait for all indicators
pub trait Indicator {
    /// Value produced once the indicator has enough history
    type Output: Copy;

    /// Get the name of the indicator
    fn name(&self) -> &str;

    /// Update indicator with a new candle
    fn update(&mut self, candle: &Candle);

    /// Get current indicator value
    fn value(&self) -> Option<Self::Output>;

    /// Check if indicator is ready (has enough data)
    fn is_ready(&self) -> bool;
}

/// Run an indicator over candles, one output per candle
pub fn calculate<'a, I, C>(mut indicator: I, candles: C) -> Vec<Option<I::Output>>
where
    I: Indicator,
    C: IntoIterator<Item = &'a Candle>,
{
    candles
        .into_iter()
        .map(|candle| {
            indicator.update(candle);
            indicator.value()
        })
        .collect()
}

/// Fill leading gaps with the first defined value.
///
/// Falls back to `default` for every slot when nothing is defined. Gaps
/// after the first defined value carry the previous value forward.
pub fn backfill<T: Copy>(series: &[Option<T>], default: T) -> Vec<T> {
    let first = series.iter().flatten().next().copied().unwrap_or(default);
    let mut last = first;
    series
        .iter()
        .map(|value| {
            if let Some(v) = value {
                last = *v;
            }
            last
        })
        .collect()
}

/// Mean of the last `period` values, or of all values when fewer exist
pub fn rolling_mean(values: &[f64], period: usize) -> Option<f64> {
    if values.is_empty() || period == 0 {
        return None;
    }
    let start = values.len().saturating_sub(period);
    let tail = &values[start..];
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backfill_leading() {
        let series = vec![None, None, Some(3.0), Some(4.0)];
        assert_eq!(backfill(&series, 50.0), vec![3.0, 3.0, 3.0, 4.0]);
    }

    #[test]
    fn test_backfill_all_missing() {
        let series: Vec<Option<f64>> = vec![None, None];
        assert_eq!(backfill(&series, 50.0), vec![50.0, 50.0]);
    }

    #[test]
    fn test_backfill_inner_gap_carries_forward() {
        let series = vec![Some(1.0), None, Some(2.0)];
        assert_eq!(backfill(&series, 0.0), vec![1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_rolling_mean() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(rolling_mean(&values, 5), Some(4.0));
        assert_eq!(rolling_mean(&values[..2], 5), Some(1.5));
        assert_eq!(rolling_mean(&[], 5), None);
    }
}
