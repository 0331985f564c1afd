use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use common::{Candle, CandleSource, Error, FetchError, KlineInterval, Result};

const KLINES_PATH: &str = "/api/v3/klines";

/// open time, open, high, low, close, volume, close time. Anything after is
/// provider extras we drop.
const KLINE_MIN_FIELDS: usize = 7;

/// Public-market REST client for Binance. No API key needed for klines.
pub struct BinanceClient {
    base_url: String,
    http: Client,
}

impl BinanceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(base_url, http))
    }

    /// Use a preconfigured HTTP client (proxy settings, custom TLS).
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: usize,
    ) -> Result<Vec<Candle>, FetchError> {
        let url = format!("{}{KLINES_PATH}", self.base_url);
        debug!(%symbol, %interval, limit, "Fetching klines");

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol.to_string()),
                ("interval", interval.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let candles = parse_klines(&body)?;
        debug!(%symbol, count = candles.len(), "Fetched klines");
        Ok(candles)
    }
}

// ─── Binance kline JSON parsing ──────────────────────────────────────────────

/// Parse a klines response body.
///
/// The endpoint answers with an array of arrays; on some errors it answers
/// with an object such as `{"code":-1121,"msg":"Invalid symbol."}`, which is
/// rejected rather than read as an empty window.
pub fn parse_klines(body: &str) -> Result<Vec<Candle>, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::BadPayload(e.to_string()))?;

    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(obj) => {
            let msg = obj
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("no message");
            return Err(FetchError::BadPayload(format!(
                "expected kline array, got object: {msg}"
            )));
        }
        other => {
            return Err(FetchError::BadPayload(format!(
                "expected kline array, got {other}"
            )))
        }
    };

    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_row(row).map_err(|e| FetchError::BadPayload(format!("row {i}: {e}"))))
        .collect()
}

fn parse_row(row: &Value) -> std::result::Result<Candle, String> {
    let fields = row.as_array().ok_or("kline is not an array")?;
    if fields.len() < KLINE_MIN_FIELDS {
        return Err(format!(
            "kline has {} fields, expected at least {KLINE_MIN_FIELDS}",
            fields.len()
        ));
    }

    Ok(Candle {
        open_time: timestamp(&fields[0], "open time")?,
        open: price(&fields[1], "open")?,
        high: price(&fields[2], "high")?,
        low: price(&fields[3], "low")?,
        close: price(&fields[4], "close")?,
        volume: price(&fields[5], "volume")?,
        close_time: timestamp(&fields[6], "close time")?,
    })
}

/// Prices arrive as decimal strings; plain numbers are accepted too.
fn price(value: &Value, name: &str) -> std::result::Result<f64, String> {
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{name} is not a finite number: {value}"))
}

fn timestamp(value: &Value, name: &str) -> std::result::Result<DateTime<Utc>, String> {
    value
        .as_i64()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .ok_or_else(|| format!("{name} is not a millisecond timestamp: {value}"))
}
