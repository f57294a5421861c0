//! Engine error types

use thiserror::Error;

/// Errors raised by the signal engine.
///
/// Computational edge cases (short windows, undefined indicators) never
/// surface here: they resolve to a HOLD decision or a back-filled value.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to build {indicator} indicator: {reason}")]
    Indicator {
        indicator: &'static str,
        reason: String,
    },
}

impl EngineError {
    pub(crate) fn indicator(indicator: &'static str, err: ta::errors::TaError) -> Self {
        Self::Indicator {
            indicator,
            reason: format!("{:?}", err),
        }
    }
}
