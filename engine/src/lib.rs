//! Signal Engine: the decision core of the signal bot
//!
//! Turns a rolling window of OHLCV candles into a vetted BUY / SELL / HOLD
//! decision with an entry price, stop-loss and profit target:
//!
//! - **Data**: [`Candle`](data::Candle) and the fixed-capacity [`CandleWindow`](data::CandleWindow)
//! - **Indicators**: RSI, EMA, ATR, MACD, Bollinger Bands, Stochastic %K and VWAP via [ta-rs](https://github.com/greyblake/ta-rs)
//! - **Structure**: break-of-structure detection on the last two candles
//! - **Strategy**: the trend / VWAP / mean-reversion cascade with the liquidity-trap veto
//! - **Risk**: adaptive ATR stop-loss and profit target, tick rounding
//! - **Engine**: the per-instrument confirmation and duplicate-suppression state machine
//!
//! # Example
//!
//! ```no_run
//! use signal_engine::prelude::*;
//!
//! let engine = SignalEngine::new(EngineConfig::default())?;
//! let mut window = CandleWindow::new(25);
//! let mut state = InstrumentState::default();
//! // ... push candles into the window every cycle ...
//! let evaluation = engine.evaluate("NSE:NIFTY 50", &window, &mut state);
//! println!("{}", evaluation.decision);
//! # Ok::<(), signal_engine::EngineError>(())
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod risk;
pub mod strategy;
pub mod structure;

pub use error::EngineError;

// Re-export commonly used types
pub mod prelude {
    pub use crate::config::*;
    pub use crate::data::*;
    pub use crate::engine::*;
    pub use crate::error::*;
    pub use crate::indicators::{IndicatorCalculator, IndicatorSnapshot};
    pub use crate::risk::*;
    pub use crate::strategy::*;
    pub use crate::structure::*;
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;
