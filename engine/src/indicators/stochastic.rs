//! Stochastic %K indicator

use crate::data::Candle;
use crate::indicators::Indicator;
use crate::{EngineError, Result};
use ta::indicators::FastStochastic;
use ta::Next;

/// %K reported while the oscillator has too little history
pub const NEUTRAL_STOCHASTIC: f64 = 50.0;

/// Fast stochastic %K over candle high / low / close
#[derive(Debug, Clone)]
pub struct StochasticK {
    inner: FastStochastic,
    period: usize,
    update_count: usize,
    last_value: Option<f64>,
}

impl StochasticK {
    pub fn new(period: usize) -> Result<Self> {
        Ok(Self {
            inner: FastStochastic::new(period)
                .map_err(|e| EngineError::indicator("Stochastic", e))?,
            period,
            update_count: 0,
            last_value: None,
        })
    }
}

impl Indicator for StochasticK {
    type Output = f64;

    fn name(&self) -> &str {
        "Stochastic %K"
    }

    fn update(&mut self, candle: &Candle) {
        let k = self.inner.next(candle);
        self.update_count += 1;
        if self.is_ready() {
            self.last_value = Some(k);
        }
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        self.update_count >= self.period
    }
}
