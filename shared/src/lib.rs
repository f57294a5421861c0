pub mod config;
pub mod kite;

pub use config::{Config, ConfigError, FeedMode, Instrument, KiteCredentials, LogFormat};
pub use kite::{minute_bucket, session_bounds, KiteApiClient, KiteError};
