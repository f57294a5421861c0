//! Signal validation

use crate::strategy::{Direction, SignalDecision};

/// Signal validator
pub struct SignalValidator;

impl SignalValidator {
    /// Prices are present exactly when actionable, and stop / target sit on
    /// the correct sides of the entry
    pub fn validate(decision: &SignalDecision) -> bool {
        match (decision.entry_price, decision.stop_loss, decision.profit_target) {
            (None, None, None) => decision.direction == Direction::Hold,
            (Some(entry), Some(sl), Some(pt)) => {
                let finite = entry.is_finite() && sl.is_finite() && pt.is_finite();
                finite
                    && match decision.direction {
                        Direction::Buy => sl < entry && pt > entry,
                        Direction::Sell => sl > entry && pt < entry,
                        Direction::Hold => false,
                    }
            }
            _ => false,
        }
    }
}
