//! Per-instrument engine state

use crate::strategy::Direction;
use serde::{Deserialize, Serialize};

/// Hysteresis memory for one instrument.
///
/// Lives for the whole process and is only mutated by
/// [`SignalStateMachine`](crate::engine::SignalStateMachine).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentState {
    /// Last accepted direction; HOLD until the first trade
    pub last_signal: Direction,
    /// Consecutive cycles a different direction has been proposed
    pub confirmation_counter: u32,
    /// Entry of the last accepted trade
    pub last_trade_price: Option<f64>,
}

impl InstrumentState {
    pub fn has_traded(&self) -> bool {
        self.last_trade_price.is_some()
    }
}
