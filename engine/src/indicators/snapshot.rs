//! Indicator snapshot calculation

use crate::config::IndicatorConfig;
use crate::data::CandleWindow;
use crate::indicators::{
    backfill, bands_over, calculate, calculate_sma, mean_true_range, rolling_mean, vwap, BBResult,
    BollingerBands, StochasticK, ATR, EMA, MACD, NEUTRAL_RSI, NEUTRAL_STOCHASTIC, RSI,
};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Latest value of every indicator for one window state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub volume: f64,
    /// Rolling mean volume over the configured short period
    pub volume_mean: f64,
    pub rsi: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    pub atr: f64,
    /// Rolling mean of the ATR series
    pub atr_mean: f64,
    /// MACD histogram (MACD line minus signal line)
    pub macd_diff: f64,
    pub vwap: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub stochastic_k: f64,
}

/// Computes [`IndicatorSnapshot`]s from candle windows.
///
/// Holds one freshly-constructed prototype per indicator and clones it for
/// every computation, so each snapshot depends on the window alone.
#[derive(Debug, Clone)]
pub struct IndicatorCalculator {
    config: IndicatorConfig,
    rsi: RSI,
    ema_short: EMA,
    ema_long: EMA,
    atr: ATR,
    macd: MACD,
    bollinger: BollingerBands,
    stochastic: StochasticK,
}

impl IndicatorCalculator {
    pub fn new(config: IndicatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rsi: RSI::new(config.rsi_period)?,
            ema_short: EMA::new(config.ema_short_period)?,
            ema_long: EMA::new(config.ema_long_period)?,
            atr: ATR::new(config.atr_period)?,
            macd: MACD::new(
                config.macd_fast_period,
                config.macd_slow_period,
                config.macd_signal_period,
            )?,
            bollinger: BollingerBands::new(config.bb_period, config.bb_std_dev)?,
            stochastic: StochasticK::new(config.stochastic_period)?,
            config,
        })
    }

    /// Compute the snapshot for the newest candle in the window.
    ///
    /// Returns `None` only for an empty window. Indicators without enough
    /// history are back-filled, or take a neutral default when never defined.
    pub fn compute(&self, window: &CandleWindow) -> Option<IndicatorSnapshot> {
        let latest = window.latest()?;
        let closes = window.closes();
        let volumes = window.volumes();

        let rsi = last(backfill(&calculate(self.rsi.clone(), window), NEUTRAL_RSI));
        let ema_short = last(backfill(&calculate(self.ema_short.clone(), window), latest.close));
        let ema_long = last(backfill(&calculate(self.ema_long.clone(), window), latest.close));
        let macd_diff = last(backfill(&calculate(self.macd.clone(), window), 0.0));
        let stochastic_k = last(backfill(
            &calculate(self.stochastic.clone(), window),
            NEUTRAL_STOCHASTIC,
        ));

        let fallback_bands = bands_over(&closes, self.config.bb_std_dev).unwrap_or(BBResult {
            upper: latest.close,
            middle: latest.close,
            lower: latest.close,
        });
        let bands = last(backfill(
            &calculate(self.bollinger.clone(), window),
            fallback_bands,
        ));

        let fallback_atr = mean_true_range(window).unwrap_or_else(|| latest.range());
        let atr_series = backfill(&calculate(self.atr.clone(), window), fallback_atr);
        let atr = last(atr_series.clone());
        let atr_mean = smoothed(&atr_series, self.config.atr_mean_period).unwrap_or(atr);

        let volume_mean =
            smoothed(&volumes, self.config.volume_mean_period).unwrap_or(latest.volume);
        let vwap = vwap(window).unwrap_or(latest.close);

        let snapshot = IndicatorSnapshot {
            close: latest.close,
            volume: latest.volume,
            volume_mean,
            rsi,
            ema_short,
            ema_long,
            atr,
            atr_mean,
            macd_diff,
            vwap,
            bb_upper: bands.upper,
            bb_lower: bands.lower,
            stochastic_k,
        };

        debug!(
            "Indicators ({} candles): RSI={:.2}, MACD={:.2}, EMA_Short={:.2}, EMA_Long={:.2}, ATR={:.2}, VWAP={:.2}, StochK={:.2}, Close={:.2}",
            window.len(),
            snapshot.rsi,
            snapshot.macd_diff,
            snapshot.ema_short,
            snapshot.ema_long,
            snapshot.atr,
            snapshot.vwap,
            snapshot.stochastic_k,
            snapshot.close
        );

        Some(snapshot)
    }
}

fn last<T: Copy>(series: Vec<T>) -> T {
    // `compute` only builds series from non-empty windows
    series[series.len() - 1]
}

/// Rolling SMA of a derived series, averaging everything when it is shorter than the period
fn smoothed(values: &[f64], period: usize) -> Option<f64> {
    calculate_sma(values, period)
        .ok()
        .and_then(|series| series.last().copied().flatten())
        .or_else(|| rolling_mean(values, period))
}
