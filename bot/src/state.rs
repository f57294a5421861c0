use crate::services::{KiteMarketData, MarketDataSource, Notifier, Poller, TelegramNotifier};
use anyhow::Context;
use shared::{Config, FeedMode, Instrument, KiteApiClient};
use signal_engine::engine::SignalEngine;
use std::sync::Arc;
use std::time::Duration;
use teloxide::Bot;

/// Long-lived services shared by every polling cycle
#[derive(Clone)]
pub struct AppState {
    pub bot_name: String,
    pub engine: Arc<SignalEngine>,
    pub source: Arc<dyn MarketDataSource>,
    pub notifier: Arc<dyn Notifier>,
    pub instruments: Vec<Instrument>,
    pub feed_mode: FeedMode,
    pub poll_interval: Duration,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let engine = SignalEngine::new(config.engine).context("invalid engine configuration")?;
        let kite = KiteApiClient::new(&config.kite).context("failed to build Kite client")?;
        let bot = Bot::new(&config.telegram_bot_token);

        Ok(AppState {
            notifier: Arc::new(TelegramNotifier::new(
                bot,
                config.telegram_chat_id,
                config.bot_name.clone(),
            )),
            bot_name: config.bot_name,
            engine: Arc::new(engine),
            source: Arc::new(KiteMarketData::new(kite)),
            instruments: config.instruments,
            feed_mode: config.feed_mode,
            poll_interval: config.poll_interval,
        })
    }

    pub fn poller(&self) -> Poller {
        Poller::new(
            self.engine.clone(),
            self.source.clone(),
            self.notifier.clone(),
            self.instruments.clone(),
            self.feed_mode,
            self.poll_interval,
        )
    }
}
