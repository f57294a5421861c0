//! Base strategy trait

use crate::indicators::IndicatorSnapshot;
use crate::strategy::Direction;

/// A pure rule over one indicator snapshot.
///
/// Returns the direction it votes for, or `None` when it does not fire.
/// Strategies never see instrument state; hysteresis lives in the engine.
pub trait Strategy: Send + Sync {
    /// Get strategy name
    fn name(&self) -> &str;

    /// Evaluate the snapshot
    fn evaluate(&self, snapshot: &IndicatorSnapshot) -> Option<Direction>;
}
