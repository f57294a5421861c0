//! Strategy engine module
//!
//! Provides the ordered strategy cascade, signal types and validation.

pub mod base;
pub mod evaluator;
pub mod implementations;
pub mod signal;
pub mod trend;
pub mod validator;

pub use base::*;
pub use evaluator::*;
pub use implementations::*;
pub use signal::*;
pub use trend::*;
pub use validator::*;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::indicators::IndicatorSnapshot;

    /// Uptrend pullback on NIFTY: trend-following fires BUY
    pub fn snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: 24_850.0,
            volume: 1_000.0,
            volume_mean: 1_500.0,
            rsi: 60.0,
            ema_short: 24_760.0,
            ema_long: 24_700.0,
            atr: 120.0,
            atr_mean: 120.0,
            macd_diff: 0.8,
            vwap: 24_800.0,
            bb_upper: 25_000.0,
            bb_lower: 24_500.0,
            stochastic_k: 15.0,
        }
    }
}
