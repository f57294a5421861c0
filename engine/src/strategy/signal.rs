//! Signal types

use crate::risk::Bracket;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Buy/Long signal
    Buy,
    /// Sell/Short signal
    Sell,
    /// Hold/No action
    #[default]
    Hold,
}

impl Direction {
    pub fn is_hold(self) -> bool {
        self == Direction::Hold
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
            Direction::Hold => "HOLD",
        })
    }
}

/// Evaluator output before risk sizing and hysteresis
#[derive(Debug, Clone, PartialEq)]
pub struct RawSignal {
    pub direction: Direction,
    /// Close rounded to the instrument tick; `None` for HOLD
    pub entry_price: Option<f64>,
    /// Strategy that fired, if any
    pub strategy: Option<String>,
    /// Reason for signal
    pub reason: String,
}

impl RawSignal {
    pub fn hold(reason: impl Into<String>) -> Self {
        Self {
            direction: Direction::Hold,
            entry_price: None,
            strategy: None,
            reason: reason.into(),
        }
    }
}

/// Final per-cycle decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDecision {
    pub direction: Direction,
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub profit_target: Option<f64>,
    /// Reason for the decision
    pub reason: String,
}

impl SignalDecision {
    /// Create hold decision
    pub fn hold(reason: impl Into<String>) -> Self {
        Self {
            direction: Direction::Hold,
            entry_price: None,
            stop_loss: None,
            profit_target: None,
            reason: reason.into(),
        }
    }

    /// Create an actionable decision from a sized bracket
    pub fn sized(direction: Direction, entry_price: f64, bracket: &Bracket, reason: impl Into<String>) -> Self {
        Self {
            direction,
            entry_price: Some(entry_price),
            stop_loss: Some(bracket.stop_loss),
            profit_target: Some(bracket.profit_target),
            reason: reason.into(),
        }
    }

    pub fn is_actionable(&self) -> bool {
        !self.direction.is_hold()
    }
}

impl fmt::Display for SignalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.entry_price, self.stop_loss, self.profit_target) {
            (Some(entry), Some(sl), Some(pt)) if self.is_actionable() => write!(
                f,
                "{} | Entry: {} | SL: {:.2} | PT: {:.2}",
                self.direction, entry, sl, pt
            ),
            _ => write!(f, "{} ({})", self.direction, self.reason),
        }
    }
}
