//! Kite Connect v3 REST client: session minute candles and last traded price

use crate::config::KiteCredentials;
use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Asia::Kolkata;
use chrono_tz::Tz;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use signal_engine::data::Candle;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

const KITE_VERSION: &str = "3";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const QUERY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum KiteError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid credentials header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("kite returned {status} ({error_type}): {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no quote returned for {0}")]
    MissingQuote(String),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    data: Option<T>,
    message: Option<String>,
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoricalData {
    candles: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    last_price: f64,
}

#[derive(Debug, Clone)]
pub struct KiteApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl KiteApiClient {
    pub fn new(credentials: &KiteCredentials) -> Result<Self, KiteError> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Kite-Version", HeaderValue::from_static(KITE_VERSION));
        let mut auth = HeaderValue::from_str(&format!(
            "token {}:{}",
            credentials.api_key, credentials.access_token
        ))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Minute candles for `token` between two exchange-local times
    pub async fn historical_candles(
        &self,
        token: u32,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Candle>, KiteError> {
        let url = format!("{}/instruments/historical/{}/minute", self.base_url, token);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("from", from.format(QUERY_TIME_FORMAT).to_string()),
                ("to", to.format(QUERY_TIME_FORMAT).to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let data: HistoricalData = decode(status, &body)?;
        let candles = data
            .candles
            .iter()
            .map(|row| parse_candle_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Fetched {} candles for token {}", candles.len(), token);
        Ok(candles)
    }

    /// Today's session candles up to `now`
    pub async fn session_candles(
        &self,
        token: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Candle>, KiteError> {
        let (from, to) = session_bounds(now);
        self.historical_candles(token, from, to).await
    }

    /// Last traded price for an exchange symbol such as `NSE:NIFTY 50`
    pub async fn ltp(&self, symbol: &str) -> Result<f64, KiteError> {
        let response = self
            .client
            .get(format!("{}/quote/ltp", self.base_url))
            .query(&[("i", symbol)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let quotes: HashMap<String, Quote> = decode(status, &body)?;
        quotes
            .get(symbol)
            .map(|q| q.last_price)
            .ok_or_else(|| KiteError::MissingQuote(symbol.to_string()))
    }
}

/// Session window in exchange time: 09:15 until 15:15, clipped to `now`
pub fn session_bounds(now: DateTime<Utc>) -> (NaiveDateTime, NaiveDateTime) {
    let local = now.with_timezone(&Kolkata);
    let date = local.date_naive();
    let open = date.and_time(NaiveTime::from_hms_opt(9, 15, 0).unwrap_or_default());
    let close = date.and_time(NaiveTime::from_hms_opt(15, 15, 0).unwrap_or_default());
    let to = local.naive_local().min(close).max(open);
    (open, to)
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, KiteError> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| {
        if status.is_success() {
            KiteError::Malformed(e.to_string())
        } else {
            KiteError::Api {
                status: status.as_u16(),
                error_type: "Unknown".to_string(),
                message: body.chars().take(200).collect(),
            }
        }
    })?;

    if !status.is_success() || envelope.status != "success" {
        return Err(KiteError::Api {
            status: status.as_u16(),
            error_type: envelope.error_type.unwrap_or_else(|| "Unknown".to_string()),
            message: envelope.message.unwrap_or_default(),
        });
    }
    envelope
        .data
        .ok_or_else(|| KiteError::Malformed("missing data".to_string()))
}

/// `[timestamp, open, high, low, close, volume, (oi)]`
fn parse_candle_row(row: &[Value]) -> Result<Candle, KiteError> {
    if row.len() < 6 {
        return Err(KiteError::Malformed(format!(
            "candle row has {} fields",
            row.len()
        )));
    }
    let timestamp = row[0]
        .as_str()
        .ok_or_else(|| KiteError::Malformed("candle timestamp is not a string".to_string()))
        .and_then(parse_timestamp)?;
    let number = |i: usize| {
        row[i]
            .as_f64()
            .ok_or_else(|| KiteError::Malformed(format!("candle field {} is not a number", i)))
    };
    Ok(Candle::new(
        number(1)?,
        number(2)?,
        number(3)?,
        number(4)?,
        number(5)?,
        timestamp,
    ))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, KiteError> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, QUERY_TIME_FORMAT)
                .ok()
                .and_then(|naive| exchange_time(naive))
                .ok_or_else(|| KiteError::Malformed(format!("bad candle timestamp '{}'", raw)))
        })
}

fn exchange_time(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Kolkata
        .from_local_datetime(&naive)
        .single()
        .map(|dt: DateTime<Tz>| dt.with_timezone(&Utc))
}

/// Minute bucket a last-traded-price tick belongs to
pub fn minute_bucket(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::seconds(now.timestamp().rem_euclid(60))
        - Duration::nanoseconds(now.timestamp_subsec_nanos() as i64)
}
