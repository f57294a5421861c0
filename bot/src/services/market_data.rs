use async_trait::async_trait;
use chrono::Utc;
use shared::{Instrument, KiteApiClient, KiteError};
use signal_engine::data::CandleWindow;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("market data unavailable for {instrument}: {source}")]
    Upstream {
        instrument: String,
        #[source]
        source: KiteError,
    },

    #[error("no last traded price for {0}")]
    NoPrice(String),
}

/// Source of candles and last traded prices for the poller
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fresh window of the most recent session candles, newest `capacity` kept
    async fn fetch_window(
        &self,
        instrument: &Instrument,
        capacity: usize,
    ) -> Result<CandleWindow, MarketDataError>;

    async fn fetch_last_price(&self, instrument: &Instrument) -> Result<f64, MarketDataError>;
}

pub struct KiteMarketData {
    client: KiteApiClient,
}

impl KiteMarketData {
    pub fn new(client: KiteApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MarketDataSource for KiteMarketData {
    async fn fetch_window(
        &self,
        instrument: &Instrument,
        capacity: usize,
    ) -> Result<CandleWindow, MarketDataError> {
        let candles = self
            .client
            .session_candles(instrument.token, Utc::now())
            .await
            .map_err(|source| MarketDataError::Upstream {
                instrument: instrument.symbol.clone(),
                source,
            })?;

        let total = candles.len();
        let valid: Vec<_> = candles.into_iter().filter(|c| c.is_valid()).collect();
        if valid.len() < total {
            warn!(
                "Dropped {} malformed candles for {}",
                total - valid.len(),
                instrument.symbol
            );
        }
        debug!("🔍 {} session candles for {}", valid.len(), instrument.symbol);
        Ok(CandleWindow::from_candles(capacity, valid))
    }

    async fn fetch_last_price(&self, instrument: &Instrument) -> Result<f64, MarketDataError> {
        let price = self
            .client
            .ltp(&instrument.symbol)
            .await
            .map_err(|source| MarketDataError::Upstream {
                instrument: instrument.symbol.clone(),
                source,
            })?;
        if price.is_finite() && price > 0.0 {
            Ok(price)
        } else {
            Err(MarketDataError::NoPrice(instrument.symbol.clone()))
        }
    }
}
