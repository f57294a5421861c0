//! Polling loop: one fan-out/fan-in of per-instrument tasks per cycle

use crate::services::{MarketDataError, MarketDataSource, Notifier, SignalAlert};
use chrono::Utc;
use shared::{minute_bucket, FeedMode, Instrument};
use signal_engine::data::{Candle, CandleWindow};
use signal_engine::engine::{Evaluation, InstrumentState, SignalEngine};
use signal_engine::strategy::TrendStrength;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Everything the poller keeps for one instrument between cycles
#[derive(Debug, Clone)]
pub struct InstrumentSlot {
    pub window: CandleWindow,
    pub state: InstrumentState,
    /// Whether the last evaluation reported a weak trend
    pub weak_trend: bool,
}

impl InstrumentSlot {
    fn new(capacity: usize) -> Self {
        Self {
            window: CandleWindow::new(capacity),
            state: InstrumentState::default(),
            weak_trend: false,
        }
    }
}

/// Per-cycle tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub evaluated: usize,
    pub signals: usize,
    pub failures: usize,
}

struct InstrumentTask {
    instrument: Instrument,
    slot: Arc<Mutex<InstrumentSlot>>,
    engine: Arc<SignalEngine>,
    source: Arc<dyn MarketDataSource>,
    notifier: Arc<dyn Notifier>,
    feed_mode: FeedMode,
}

pub struct Poller {
    engine: Arc<SignalEngine>,
    source: Arc<dyn MarketDataSource>,
    notifier: Arc<dyn Notifier>,
    feed_mode: FeedMode,
    poll_interval: Duration,
    slots: Vec<(Instrument, Arc<Mutex<InstrumentSlot>>)>,
}

impl Poller {
    pub fn new(
        engine: Arc<SignalEngine>,
        source: Arc<dyn MarketDataSource>,
        notifier: Arc<dyn Notifier>,
        instruments: Vec<Instrument>,
        feed_mode: FeedMode,
        poll_interval: Duration,
    ) -> Self {
        let capacity = engine.config().window_capacity;
        let slots = instruments
            .into_iter()
            .map(|instrument| (instrument, Arc::new(Mutex::new(InstrumentSlot::new(capacity)))))
            .collect();
        Self {
            engine,
            source,
            notifier,
            feed_mode,
            poll_interval,
            slots,
        }
    }

    /// Poll until `shutdown` flips to true; a cycle in flight always completes
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycle: u64 = 0;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    cycle += 1;
                    let report = self.run_cycle().await;
                    info!(
                        "⏳ Cycle #{} done: {} evaluated, {} signals, {} failures. Waiting for next cycle...",
                        cycle, report.evaluated, report.signals, report.failures
                    );
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Shutdown requested, stopping poller after {} cycles", cycle);
                        break;
                    }
                }
            }
        }
    }

    /// Evaluate every instrument concurrently and wait for all of them
    pub async fn run_cycle(&self) -> CycleReport {
        let mut tasks = JoinSet::new();
        for (instrument, slot) in &self.slots {
            let task = InstrumentTask {
                instrument: instrument.clone(),
                slot: slot.clone(),
                engine: self.engine.clone(),
                source: self.source.clone(),
                notifier: self.notifier.clone(),
                feed_mode: self.feed_mode,
            };
            tasks.spawn(process_instrument(task));
        }

        let mut report = CycleReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(signalled)) => {
                    report.evaluated += 1;
                    if signalled {
                        report.signals += 1;
                    }
                }
                Ok(Err(_)) => report.failures += 1,
                Err(e) => {
                    error!("Instrument task panicked: {}", e);
                    report.failures += 1;
                }
            }
        }
        report
    }

    /// Snapshot of an instrument's slot, mainly for inspection in tests
    pub async fn slot(&self, symbol: &str) -> Option<InstrumentSlot> {
        for (instrument, slot) in &self.slots {
            if instrument.symbol == symbol {
                return Some(slot.lock().await.clone());
            }
        }
        None
    }
}

/// One instrument, one cycle. Returns whether an alert-worthy signal was produced.
async fn process_instrument(task: InstrumentTask) -> Result<bool, MarketDataError> {
    let symbol = task.instrument.symbol.as_str();
    let mut guard = task.slot.lock().await;
    let slot = &mut *guard;

    if let Err(e) = refresh_window(&task, &mut slot.window).await {
        warn!("❌ {}", e);
        if let Err(alert_err) = task
            .notifier
            .send_operational(&format!("❌ {}", e))
            .await
        {
            error!("Failed to send operational alert: {}", alert_err);
        }
        return Err(e);
    }

    let evaluation = task.engine.evaluate(symbol, &slot.window, &mut slot.state);
    log_evaluation(symbol, &evaluation);

    if let Some(trend) = evaluation.trend {
        let weak = trend.is_weak();
        if weak && !slot.weak_trend {
            if let Some(message) = weak_trend_message(symbol, &trend) {
                warn!("{}", message);
                if let Err(e) = task.notifier.send_operational(&message).await {
                    error!("Failed to send weak trend warning: {}", e);
                }
            }
        }
        slot.weak_trend = weak;
    }

    if !evaluation.decision.is_actionable() {
        return Ok(false);
    }

    let alert = SignalAlert::new(symbol, evaluation.decision);
    info!("{}", alert.message());
    if let Err(e) = task.notifier.send_signal(&alert).await {
        error!("Failed to deliver signal for {}: {}", symbol, e);
    }
    Ok(true)
}

async fn refresh_window(
    task: &InstrumentTask,
    window: &mut CandleWindow,
) -> Result<(), MarketDataError> {
    let capacity = task.engine.config().window_capacity;
    match task.feed_mode {
        FeedMode::Historical => {
            *window = task.source.fetch_window(&task.instrument, capacity).await?;
        }
        FeedMode::Live if window.is_empty() => {
            *window = task.source.fetch_window(&task.instrument, capacity).await?;
            info!(
                "Bootstrapped {} with {} candles",
                task.instrument.symbol,
                window.len()
            );
        }
        FeedMode::Live => {
            let price = task.source.fetch_last_price(&task.instrument).await?;
            window.push(Candle::from_tick(price, minute_bucket(Utc::now())));
        }
    }
    Ok(())
}

fn log_evaluation(symbol: &str, evaluation: &Evaluation) {
    let trend = evaluation
        .trend
        .map(|t| t.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    debug!(
        "{}: structure {}, trend {}, decision {}",
        symbol, evaluation.structure, trend, evaluation.decision
    );
}

fn weak_trend_message(symbol: &str, trend: &TrendStrength) -> Option<String> {
    match *trend {
        TrendStrength::Weak { gap, threshold } => Some(format!(
            "⚠ Weak Trend in {}: EMA Gap {:.2} too small (Threshold: {})",
            symbol, gap, threshold
        )),
        TrendStrength::Strong { .. } => None,
    }
}
