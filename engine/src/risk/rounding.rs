//! Instrument tick rounding

use crate::config::InstrumentTable;

/// Rounds prices onto each instrument's tick grid
#[derive(Debug, Clone)]
pub struct TickRounder {
    tick_sizes: InstrumentTable,
}

impl TickRounder {
    pub fn new(tick_sizes: InstrumentTable) -> Self {
        Self { tick_sizes }
    }

    /// Tick size for an instrument
    pub fn tick_size(&self, instrument: &str) -> f64 {
        self.tick_sizes.lookup(instrument)
    }

    /// Round to the nearest multiple of the instrument's tick
    pub fn round(&self, instrument: &str, price: f64) -> f64 {
        round_to_tick(price, self.tick_size(instrument))
    }
}

/// Round `price` to the nearest multiple of `tick`; a non-positive tick leaves it unchanged
pub fn round_to_tick(price: f64, tick: f64) -> f64 {
    if tick > 0.0 {
        (price / tick).round() * tick
    } else {
        price
    }
}
