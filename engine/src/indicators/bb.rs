//! Bollinger Bands indicator

use crate::data::Candle;
use crate::indicators::Indicator;
use crate::{EngineError, Result};
use ta::indicators::{BollingerBands as TaBollingerBands, BollingerBandsOutput};
use ta::Next;

/// Bollinger Bands indicator wrapper
#[derive(Debug, Clone)]
pub struct BollingerBands {
    inner: TaBollingerBands,
    period: usize,
    update_count: usize,
    last_output: Option<BollingerBandsOutput>,
}

/// Bollinger Bands result structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands indicator
    pub fn new(period: usize, std_dev: f64) -> Result<Self> {
        Ok(Self {
            inner: TaBollingerBands::new(period, std_dev)
                .map_err(|e| EngineError::indicator("BollingerBands", e))?,
            period,
            update_count: 0,
            last_output: None,
        })
    }
}

impl Indicator for BollingerBands {
    type Output = BBResult;

    fn name(&self) -> &str {
        "BollingerBands"
    }

    fn update(&mut self, candle: &Candle) {
        let output = self.inner.next(candle.close);
        self.update_count += 1;
        if self.is_ready() {
            self.last_output = Some(output);
        }
    }

    fn value(&self) -> Option<BBResult> {
        self.last_output.as_ref().map(|o| BBResult {
            upper: o.upper,
            middle: o.average,
            lower: o.lower,
        })
    }

    fn is_ready(&self) -> bool {
        self.update_count >= self.period
    }
}

/// Bands over every close given, for windows shorter than the band period
pub fn bands_over(closes: &[f64], std_dev: f64) -> Option<BBResult> {
    if closes.is_empty() {
        return None;
    }
    let n = closes.len() as f64;
    let mean = closes.iter().sum::<f64>() / n;
    let variance = closes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
    let width = std_dev * variance.sqrt();
    Some(BBResult {
        upper: mean + width,
        middle: mean,
        lower: mean - width,
    })
}
