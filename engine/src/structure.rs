//! Market structure detection
//!
//! Classifies the last two candles as a bullish or bearish break of
//! structure (BOS). Advisory unless the strategy config requires it.

use crate::data::{Candle, CandleWindow};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Short-term structure from the two most recent candles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketStructure {
    /// Latest high exceeds the previous high
    BullishBos,
    /// Latest low undercuts the previous low
    BearishBos,
    NoChange,
    /// Fewer than two candles
    NoData,
}

impl MarketStructure {
    /// Classify a pair of candles; the high-break check runs first
    pub fn classify(previous: &Candle, latest: &Candle) -> Self {
        if latest.high > previous.high {
            Self::BullishBos
        } else if latest.low < previous.low {
            Self::BearishBos
        } else {
            Self::NoChange
        }
    }

    /// Classify the newest two candles of a window
    pub fn detect(window: &CandleWindow) -> Self {
        match (window.previous(), window.latest()) {
            (Some(previous), Some(latest)) => Self::classify(previous, latest),
            _ => Self::NoData,
        }
    }
}

impl fmt::Display for MarketStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BullishBos => "BULLISH_BOS",
            Self::BearishBos => "BEARISH_BOS",
            Self::NoChange => "NO_CHANGE",
            Self::NoData => "NO_DATA",
        };
        f.write_str(label)
    }
}
