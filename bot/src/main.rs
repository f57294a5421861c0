use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use dotenv::dotenv;
use shared::{Config, LogFormat};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

mod services;
mod state;

use crate::state::AppState;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

/// Git hash, branch and build time captured by build.rs
fn build_info() -> String {
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let git_branch = option_env!("GIT_BRANCH").unwrap_or("unknown");
    let build_time_raw = option_env!("BUILD_TIME").unwrap_or("unknown");
    let build_time = build_time_raw
        .parse::<i64>()
        .ok()
        .and_then(|epoch| Utc.timestamp_opt(epoch, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| build_time_raw.to_string());
    format!(
        "v{} ({}@{}, built {})",
        env!("CARGO_PKG_VERSION"),
        git_hash,
        git_branch,
        build_time
    )
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    init_tracing(LogFormat::from_env());

    tracing::info!("🚀 Starting signal bot {}", build_info());

    let config = Config::from_env().context("failed to load configuration")?;
    let app_state = AppState::new(config)?;
    tracing::info!(
        "{} watching {} instruments every {:?} ({} feed)",
        app_state.bot_name,
        app_state.instruments.len(),
        app_state.poll_interval,
        app_state.feed_mode
    );
    for instrument in &app_state.instruments {
        tracing::info!("  {} (token {})", instrument.symbol, instrument.token);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl-C received, finishing the current cycle");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                // Keep the sender alive so the poller is not told to stop
                std::future::pending::<()>().await;
                drop(shutdown_tx);
            }
        }
    });

    app_state.poller().run(shutdown_rx).await;

    tracing::info!("Signal bot stopped");
    Ok(())
}
