//! Confirmation and duplicate-suppression state machine

use crate::engine::InstrumentState;
use crate::strategy::SignalDecision;
use tracing::info;

/// Outcome of one transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Candidate was already HOLD
    Idle,
    /// A new direction was seen but has not persisted long enough
    Provisional { count: u32, threshold: u32 },
    /// Accepted direction too close to the last trade price
    Duplicate,
    Accepted,
}

/// Applies flip hysteresis and duplicate suppression to sized candidates
#[derive(Debug, Clone)]
pub struct SignalStateMachine {
    confirmation_threshold: u32,
    min_trade_distance: f64,
}

impl SignalStateMachine {
    pub fn new(confirmation_threshold: u32, min_trade_distance: f64) -> Self {
        Self {
            confirmation_threshold: confirmation_threshold.max(1),
            min_trade_distance,
        }
    }

    /// Compute the successor state and the emitted decision without mutating anything
    pub fn next(
        &self,
        state: &InstrumentState,
        candidate: &SignalDecision,
    ) -> (InstrumentState, SignalDecision, Transition) {
        let mut next = state.clone();
        let direction = candidate.direction;

        let entry = match candidate.entry_price {
            Some(entry) if !direction.is_hold() => entry,
            _ => return (next, candidate.clone(), Transition::Idle),
        };

        if direction == state.last_signal {
            next.confirmation_counter = 0;
        } else {
            next.confirmation_counter = state.confirmation_counter.saturating_add(1);
            if next.confirmation_counter < self.confirmation_threshold {
                let decision = SignalDecision::hold(format!(
                    "{} awaiting confirmation ({}/{})",
                    direction, next.confirmation_counter, self.confirmation_threshold
                ));
                let transition = Transition::Provisional {
                    count: next.confirmation_counter,
                    threshold: self.confirmation_threshold,
                };
                return (next, decision, transition);
            }
        }

        if let Some(last) = state.last_trade_price {
            if (last - entry).abs() < self.min_trade_distance {
                let decision = SignalDecision::hold(format!(
                    "duplicate {} at {} (last trade {})",
                    direction, entry, last
                ));
                return (next, decision, Transition::Duplicate);
            }
        }

        next.confirmation_counter = 0;
        next.last_signal = direction;
        next.last_trade_price = Some(entry);
        (next, candidate.clone(), Transition::Accepted)
    }

    /// Run one transition and commit the successor state
    pub fn apply(
        &self,
        instrument: &str,
        state: &mut InstrumentState,
        candidate: &SignalDecision,
    ) -> SignalDecision {
        let (next, decision, transition) = self.next(state, candidate);
        match transition {
            Transition::Provisional { count, threshold } => info!(
                "{}: {} flip held ({}/{})",
                instrument, candidate.direction, count, threshold
            ),
            Transition::Duplicate => info!(
                "{}: {} suppressed as duplicate of last trade",
                instrument, candidate.direction
            ),
            Transition::Accepted => info!("{}: accepted {}", instrument, decision),
            Transition::Idle => {}
        }
        *state = next;
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::Bracket;
    use crate::strategy::Direction;

    fn candidate(direction: Direction, entry: f64) -> SignalDecision {
        let side = if direction == Direction::Buy { 1.0 } else { -1.0 };
        let bracket = Bracket {
            stop_loss: entry - side * 300.0,
            profit_target: entry + side * 400.0,
            atr_multiplier: 3.0,
            reward_multiplier: 3.5,
        };
        SignalDecision::sized(direction, entry, &bracket, "test")
    }

    fn machine() -> SignalStateMachine {
        SignalStateMachine::new(3, 20.0)
    }

    #[test]
    fn test_first_signal_needs_confirmation() {
        let m = machine();
        let mut state = InstrumentState::default();
        let buy = candidate(Direction::Buy, 24_850.0);

        assert_eq!(m.apply("X", &mut state, &buy).direction, Direction::Hold);
        assert_eq!(state.confirmation_counter, 1);
        assert_eq!(m.apply("X", &mut state, &buy).direction, Direction::Hold);
        assert_eq!(state.confirmation_counter, 2);

        let accepted = m.apply("X", &mut state, &buy);
        assert_eq!(accepted, buy);
        assert_eq!(state.last_signal, Direction::Buy);
        assert_eq!(state.last_trade_price, Some(24_850.0));
        assert_eq!(state.confirmation_counter, 0);
    }

    #[test]
    fn test_hold_keeps_history() {
        let m = machine();
        let mut state = InstrumentState {
            last_signal: Direction::Buy,
            confirmation_counter: 2,
            last_trade_price: Some(100.0),
        };
        let before = state.clone();
        let decision = m.apply("X", &mut state, &SignalDecision::hold("quiet"));
        assert_eq!(decision.direction, Direction::Hold);
        assert_eq!(state, before);
    }

    #[test]
    fn test_same_direction_skips_confirmation() {
        let m = machine();
        let mut state = InstrumentState {
            last_signal: Direction::Buy,
            confirmation_counter: 1,
            last_trade_price: Some(24_850.0),
        };
        let decision = m.apply("X", &mut state, &candidate(Direction::Buy, 24_950.0));
        assert_eq!(decision.direction, Direction::Buy);
        assert_eq!(state.last_trade_price, Some(24_950.0));
        assert_eq!(state.confirmation_counter, 0);
    }

    #[test]
    fn test_duplicate_suppressed_without_touching_trade() {
        let m = machine();
        let mut state = InstrumentState {
            last_signal: Direction::Buy,
            confirmation_counter: 0,
            last_trade_price: Some(24_850.0),
        };
        let decision = m.apply("X", &mut state, &candidate(Direction::Buy, 24_860.0));
        assert_eq!(decision.direction, Direction::Hold);
        assert_eq!(state.last_trade_price, Some(24_850.0));
    }

    #[test]
    fn test_distance_boundary_is_accepted() {
        let m = machine();
        let mut state = InstrumentState {
            last_signal: Direction::Buy,
            confirmation_counter: 0,
            last_trade_price: Some(24_850.0),
        };
        let decision = m.apply("X", &mut state, &candidate(Direction::Buy, 24_870.0));
        assert_eq!(decision.direction, Direction::Buy);
    }

    #[test]
    fn test_confirmed_duplicate_flip_keeps_counter() {
        let m = machine();
        let mut state = InstrumentState {
            last_signal: Direction::Buy,
            confirmation_counter: 2,
            last_trade_price: Some(24_850.0),
        };
        let sell = candidate(Direction::Sell, 24_850.0);
        assert_eq!(m.apply("X", &mut state, &sell).direction, Direction::Hold);
        assert_eq!(state.confirmation_counter, 3);
        assert_eq!(state.last_signal, Direction::Buy);

        // Next qualifying cycle at a new level goes straight through
        let sell = candidate(Direction::Sell, 24_800.0);
        assert_eq!(m.apply("X", &mut state, &sell).direction, Direction::Sell);
        assert_eq!(state.confirmation_counter, 0);
    }

    #[test]
    fn test_next_is_pure() {
        let m = machine();
        let state = InstrumentState::default();
        let buy = candidate(Direction::Buy, 100.0);
        let (a, _, _) = m.next(&state, &buy);
        let (b, _, _) = m.next(&state, &buy);
        assert_eq!(a, b);
        assert_eq!(state, InstrumentState::default());
    }

    #[test]
    fn test_threshold_of_one_accepts_immediately() {
        let m = SignalStateMachine::new(1, 20.0);
        let mut state = InstrumentState::default();
        let decision = m.apply("X", &mut state, &candidate(Direction::Sell, 100.0));
        assert_eq!(decision.direction, Direction::Sell);
    }
}
