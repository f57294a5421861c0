//! Trend strength assessment

use crate::config::InstrumentTable;
use crate::indicators::IndicatorSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far apart the fast and slow EMAs are, relative to the instrument's threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrendStrength {
    Strong { gap: f64 },
    Weak { gap: f64, threshold: f64 },
}

impl TrendStrength {
    /// Compare `|ema_short - ema_long|` with the instrument's gap threshold
    pub fn assess(instrument: &str, snapshot: &IndicatorSnapshot, gaps: &InstrumentTable) -> Self {
        let gap = (snapshot.ema_short - snapshot.ema_long).abs();
        let threshold = gaps.lookup(instrument);
        if gap < threshold {
            Self::Weak { gap, threshold }
        } else {
            Self::Strong { gap }
        }
    }

    pub fn is_weak(&self) -> bool {
        matches!(self, Self::Weak { .. })
    }

    pub fn gap(&self) -> f64 {
        match *self {
            Self::Strong { gap } | Self::Weak { gap, .. } => gap,
        }
    }
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strong { gap } => write!(f, "Strong (EMA gap {:.2})", gap),
            Self::Weak { gap, threshold } => {
                write!(f, "Weak (EMA gap {:.2} below {})", gap, threshold)
            }
        }
    }
}
