//! SMA (Simple Moving Average) over arbitrary series

use crate::{EngineError, Result};
use ta::indicators::SimpleMovingAverage;
use ta::Next;

/// SMA wrapper for derived series (volume, ATR) rather than candles
#[derive(Debug, Clone)]
pub struct SMA {
    inner: SimpleMovingAverage,
    period: usize,
    update_count: usize,
    last_value: Option<f64>,
}

impl SMA {
    /// Create new SMA indicator
    pub fn new(period: usize) -> Result<Self> {
        Ok(Self {
            inner: SimpleMovingAverage::new(period)
                .map_err(|e| EngineError::indicator("SMA", e))?,
            period,
            update_count: 0,
            last_value: None,
        })
    }

    /// Feed one value
    pub fn update(&mut self, value: f64) {
        let sma_value = self.inner.next(value);
        self.update_count += 1;
        if self.is_ready() {
            self.last_value = Some(sma_value);
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.last_value
    }

    pub fn is_ready(&self) -> bool {
        self.update_count >= self.period
    }
}

/// Calculate SMA from a series of values
pub fn calculate_sma(values: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = SMA::new(period)?;
    Ok(values
        .iter()
        .map(|&value| {
            sma.update(value);
            sma.value()
        })
        .collect())
}
