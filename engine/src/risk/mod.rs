//! Risk management
//!
//! Adaptive ATR stop-loss / profit-target sizing and tick rounding.

pub mod rounding;
pub mod sizer;

pub use rounding::*;
pub use sizer::*;
