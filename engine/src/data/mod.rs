//! Data management module
//!
//! OHLCV candles and the fixed-capacity per-instrument window.

pub mod candle;
pub mod window;

pub use candle::*;
pub use window::*;
