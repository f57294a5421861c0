use anyhow::Result;
use async_trait::async_trait;
use signal_engine::strategy::SignalDecision;
use std::future::Future;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;
use tracing::{error, info, warn};

/// Telegram's per-message character limit
pub const MAX_MESSAGE_LEN: usize = 4096;
/// Attempts per chunk, including the first
pub const SEND_ATTEMPTS: u32 = 3;

/// An accepted non-HOLD decision for one instrument
#[derive(Debug, Clone, PartialEq)]
pub struct SignalAlert {
    pub instrument: String,
    pub decision: SignalDecision,
}

impl SignalAlert {
    pub fn new(instrument: impl Into<String>, decision: SignalDecision) -> Self {
        Self {
            instrument: instrument.into(),
            decision,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "📊 ATR Multiplier Signal for {}: {}",
            self.instrument, self.decision
        )
    }
}

/// Alert delivery for accepted signals and operator warnings
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_signal(&self, alert: &SignalAlert) -> Result<()>;

    /// Warnings and failures meant for the operator
    async fn send_operational(&self, message: &str) -> Result<()>;
}

pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
    bot_name: String,
    retry_delay: Duration,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, chat_id: i64, bot_name: impl Into<String>) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
            bot_name: bot_name.into(),
            retry_delay: Duration::from_secs(1),
        }
    }

    async fn deliver(&self, title: Option<&str>, body: &str) -> Result<()> {
        for chunk in render_chunks(title, body, MAX_MESSAGE_LEN) {
            let sent = with_retry(SEND_ATTEMPTS, self.retry_delay, || {
                let bot = self.bot.clone();
                let chat_id = self.chat_id;
                let text = chunk.clone();
                async move {
                    bot.send_message(chat_id, text)
                        .parse_mode(ParseMode::Html)
                        .await
                }
            })
            .await;

            if let Err(e) = sent {
                error!(
                    "Failed to send Telegram message to {} after {} attempts: {}",
                    self.chat_id.0, SEND_ATTEMPTS, e
                );
                return Err(e.into());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_signal(&self, alert: &SignalAlert) -> Result<()> {
        self.deliver(Some(&self.bot_name), &alert.message()).await?;
        info!("✅ Signal for {} sent to chat {}", alert.instrument, self.chat_id.0);
        Ok(())
    }

    async fn send_operational(&self, message: &str) -> Result<()> {
        self.deliver(None, message).await
    }
}

/// HTML message bodies, each within `limit` visible characters.
///
/// The raw text is split before escaping so no chunk cuts through an entity.
/// The bold title only heads the first chunk.
pub fn render_chunks(title: Option<&str>, body: &str, limit: usize) -> Vec<String> {
    let title_len = title.map_or(0, |t| t.chars().count() + 1);
    let mut chunks = Vec::new();
    let mut rest: Vec<char> = body.chars().collect();

    if let Some(title) = title {
        let take = limit.saturating_sub(title_len).max(1).min(rest.len());
        let first: String = rest.drain(..take).collect();
        chunks.push(format!("<b>{}</b>\n{}", html::escape(title), html::escape(&first)));
        if rest.is_empty() {
            return chunks;
        }
    }

    let remaining: String = rest.into_iter().collect();
    chunks.extend(
        split_message(&remaining, limit)
            .iter()
            .map(|piece| html::escape(piece)),
    );
    chunks
}

/// Split on character boundaries into pieces of at most `limit` characters
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(limit.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Run `op` up to `attempts` times, doubling the delay from `base_delay` between tries
pub async fn with_retry<T, E, F, Fut>(
    attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                let delay = base_delay * 2u32.pow(attempt - 1);
                warn!(
                    "Send failed (attempt {}/{}): {}. Retrying in {:?}",
                    attempt, attempts, e, delay
                );
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
