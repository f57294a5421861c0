pub mod alerts;
pub mod market_data;
pub mod poller;

pub use alerts::{Notifier, SignalAlert, TelegramNotifier};
pub use market_data::{KiteMarketData, MarketDataError, MarketDataSource};
pub use poller::{CycleReport, Poller};
