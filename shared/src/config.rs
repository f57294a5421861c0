use dotenv::dotenv;
use signal_engine::config::{EngineConfig, InstrumentTable, StructurePolicy};
use signal_engine::EngineError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_KITE_BASE_URL: &str = "https://api.kite.trade";
pub const DEFAULT_INSTRUMENTS: &str = "NSE:NIFTY 50=256265,NSE:NIFTY BANK=260105";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// How the poller refreshes candle windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedMode {
    /// Re-fetch the session's minute candles every cycle
    #[default]
    Historical,
    /// Bootstrap from history once, then append last-traded-price ticks
    Live,
}

impl FromStr for FeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "historical" | "history" => Ok(Self::Historical),
            "live" | "ltp" => Ok(Self::Live),
            other => Err(format!("expected 'historical' or 'live', got '{}'", other)),
        }
    }
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Historical => write!(f, "historical"),
            Self::Live => write!(f, "live"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT` directly; logging is set up before the full config loads
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(v) if v.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Exchange symbol plus the numeric token the historical API wants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub symbol: String,
    pub token: u32,
}

#[derive(Clone)]
pub struct KiteCredentials {
    pub api_key: String,
    pub access_token: String,
    pub base_url: String,
}

impl fmt::Debug for KiteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KiteCredentials")
            .field("api_key", &self.api_key)
            .field("access_token", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub struct Config {
    pub bot_name: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: i64,
    pub kite: KiteCredentials,
    pub instruments: Vec<Instrument>,
    pub poll_interval: Duration,
    pub feed_mode: FeedMode,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let defaults = EngineConfig::default();

        let mut engine = EngineConfig {
            window_capacity: env.parse_or("WINDOW_CAPACITY", defaults.window_capacity)?,
            min_candles: env.parse_or("MIN_CANDLES", defaults.min_candles)?,
            confirmation_threshold: env
                .parse_or("CONFIRMATION_THRESHOLD", defaults.confirmation_threshold)?,
            min_trade_distance: env.parse_or("MIN_TRADE_DISTANCE", defaults.min_trade_distance)?,
            ..defaults
        };

        let risk = &mut engine.risk;
        risk.min_multiplier = env.parse_or("ATR_MIN_MULTIPLIER", risk.min_multiplier)?;
        risk.max_multiplier = env.parse_or("ATR_MAX_MULTIPLIER", risk.max_multiplier)?;
        risk.reward_multiplier = env.parse_or("REWARD_MULTIPLIER", risk.reward_multiplier)?;
        risk.enforce_reward_floor = env.parse_or("ENFORCE_REWARD_FLOOR", risk.enforce_reward_floor)?;
        risk.tick_sizes = env.table("TICK_SIZES", "DEFAULT_TICK_SIZE", &risk.tick_sizes)?;

        let strategy = &mut engine.strategy;
        strategy.structure_policy =
            env.parse_or::<StructurePolicy>("STRUCTURE_POLICY", strategy.structure_policy)?;
        strategy.weak_trend_gaps = env.table(
            "WEAK_TREND_GAPS",
            "DEFAULT_WEAK_TREND_GAP",
            &strategy.weak_trend_gaps,
        )?;

        engine.validate()?;

        let poll_secs: u64 = env.parse_or("POLL_INTERVAL_SECS", 60)?;
        if poll_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_SECS",
                value: "0".to_string(),
                reason: "must be at least one second".to_string(),
            });
        }

        let chat_id = env.required("TELEGRAM_CHAT_ID")?;
        let telegram_chat_id = chat_id.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "TELEGRAM_CHAT_ID",
            value: chat_id.clone(),
            reason: "expected a numeric chat id".to_string(),
        })?;

        let instruments_raw = env
            .get("INSTRUMENTS")
            .unwrap_or_else(|| DEFAULT_INSTRUMENTS.to_string());
        let instruments =
            parse_instruments(&instruments_raw).map_err(|reason| ConfigError::Invalid {
                key: "INSTRUMENTS",
                value: instruments_raw.clone(),
                reason,
            })?;

        Ok(Config {
            bot_name: env.get("BOT_NAME").unwrap_or_else(|| "Signal Bot".to_string()),
            telegram_bot_token: env.required("TELEGRAM_BOT_TOKEN")?,
            telegram_chat_id,
            kite: KiteCredentials {
                api_key: env.required("KITE_API_KEY")?,
                access_token: env.required("KITE_ACCESS_TOKEN")?,
                base_url: env
                    .get("KITE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_KITE_BASE_URL.to_string()),
            },
            instruments,
            poll_interval: Duration::from_secs(poll_secs),
            feed_mode: env.parse_or("FEED_MODE", FeedMode::default())?,
            engine,
        })
    }
}

/// `SYMBOL=token` pairs separated by commas; symbols must be unique
pub fn parse_instruments(raw: &str) -> Result<Vec<Instrument>, String> {
    let mut seen = HashMap::new();
    let mut instruments = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (symbol, token) = entry
            .rsplit_once('=')
            .ok_or_else(|| format!("expected SYMBOL=token, got '{}'", entry))?;
        let symbol = symbol.trim().to_string();
        let token: u32 = token
            .trim()
            .parse()
            .map_err(|_| format!("invalid instrument token in '{}'", entry))?;
        if seen.insert(symbol.clone(), token).is_some() {
            return Err(format!("duplicate instrument '{}'", symbol));
        }
        instruments.push(Instrument { symbol, token });
    }
    if instruments.is_empty() {
        return Err("at least one instrument is required".to_string());
    }
    Ok(instruments)
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn table(
        &self,
        rules_key: &'static str,
        default_key: &'static str,
        fallback: &InstrumentTable,
    ) -> Result<InstrumentTable, ConfigError> {
        let default = self.parse_or(default_key, fallback.default)?;
        match self.get(rules_key) {
            Some(raw) => {
                InstrumentTable::parse(&raw, default).map_err(|reason| ConfigError::Invalid {
                    key: rules_key,
                    value: raw.clone(),
                    reason,
                })
            }
            None => Ok(InstrumentTable {
                default,
                rules: fallback.rules.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("KITE_API_KEY", "key"),
        ("KITE_ACCESS_TOKEN", "token"),
        ("TELEGRAM_BOT_TOKEN", "123:abc"),
        ("TELEGRAM_CHAT_ID", "-100200300"),
    ];

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        REQUIRED.iter().chain(extra.iter()).copied().collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.telegram_chat_id, -100200300);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.feed_mode, FeedMode::Historical);
        assert_eq!(config.kite.base_url, DEFAULT_KITE_BASE_URL);
        assert_eq!(
            config.instruments,
            vec![
                Instrument {
                    symbol: "NSE:NIFTY 50".to_string(),
                    token: 256265
                },
                Instrument {
                    symbol: "NSE:NIFTY BANK".to_string(),
                    token: 260105
                },
            ]
        );
        assert_eq!(config.engine.risk.tick_sizes.lookup("NSE:NIFTY BANK"), 100.0);
        assert_eq!(config.engine.strategy.weak_trend_gaps.lookup("NSE:NIFTY 50"), 8.5);
    }

    #[test]
    fn test_missing_required() {
        let err = Config::from_lookup(lookup(&REQUIRED[1..])).err().unwrap();
        assert!(matches!(err, ConfigError::Missing("KITE_API_KEY")));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&with(&[
            ("FEED_MODE", "live"),
            ("POLL_INTERVAL_SECS", "30"),
            ("CONFIRMATION_THRESHOLD", "2"),
            ("STRUCTURE_POLICY", "require"),
            ("TICK_SIZES", "BANK=100,FIN=25"),
            ("DEFAULT_TICK_SIZE", "10"),
            ("ENFORCE_REWARD_FLOOR", "false"),
        ])))
        .unwrap();
        assert_eq!(config.feed_mode, FeedMode::Live);
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.engine.confirmation_threshold, 2);
        assert_eq!(
            config.engine.strategy.structure_policy,
            StructurePolicy::RequireConfirmation
        );
        assert_eq!(config.engine.risk.tick_sizes.lookup("NSE:FINNIFTY"), 25.0);
        assert_eq!(config.engine.risk.tick_sizes.lookup("NSE:SENSEX"), 10.0);
        assert!(!config.engine.risk.enforce_reward_floor);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&with(&[("WINDOW_CAPACITY", "abc")])))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "WINDOW_CAPACITY",
                ..
            }
        ));

        let err = Config::from_lookup(lookup(&with(&[("WINDOW_CAPACITY", "10")])))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::Engine(_)));

        let err = Config::from_lookup(lookup(&with(&[
            ("ATR_MIN_MULTIPLIER", "6"),
            ("ATR_MAX_MULTIPLIER", "5"),
        ])))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::Engine(_)));
    }

    #[test]
    fn test_parse_instruments() {
        let parsed = parse_instruments("NSE:NIFTY 50=256265").unwrap();
        assert_eq!(parsed[0].symbol, "NSE:NIFTY 50");
        assert!(parse_instruments("").is_err());
        assert!(parse_instruments("NSE:NIFTY 50").is_err());
        assert!(parse_instruments("A=1,A=2").is_err());
    }
}
