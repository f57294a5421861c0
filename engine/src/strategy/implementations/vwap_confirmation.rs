//! VWAP confirmation strategy

use crate::indicators::IndicatorSnapshot;
use crate::strategy::{Direction, Strategy};

/// Price on one side of VWAP, confirmed by above-average volume.
///
/// BUY when close is above VWAP, SELL when below; either way the latest
/// volume must exceed its short rolling mean.
#[derive(Debug, Clone, Default)]
pub struct VwapConfirmationStrategy;

impl Strategy for VwapConfirmationStrategy {
    fn name(&self) -> &str {
        "VWAP Confirmation"
    }

    fn evaluate(&self, s: &IndicatorSnapshot) -> Option<Direction> {
        if s.volume <= s.volume_mean {
            return None;
        }
        if s.close > s.vwap {
            Some(Direction::Buy)
        } else if s.close < s.vwap {
            Some(Direction::Sell)
        } else {
            None
        }
    }
}
