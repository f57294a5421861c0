//! Strategy implementations, in cascade order

pub mod mean_reversion;
pub mod trend_following;
pub mod vwap_confirmation;

pub use mean_reversion::*;
pub use trend_following::*;
pub use vwap_confirmation::*;
