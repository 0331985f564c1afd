//! Canned collaborators for scanner and status tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Mutex;

use common::{Alert, AlertSink, Candle, CandleSource, Error, FetchError, KlineInterval, Result};

/// 250 closes zig-zagging up to exactly 150.0; fires a long with default
/// parameters (RSI ≈ 60.6, positive histogram).
pub fn long_setup() -> Vec<f64> {
    let up = 50.0 / 38.2;
    let down = up * 0.7;
    let mut closes = vec![0.0; 250];
    closes[249] = 150.0;
    let mut rising = true;
    for i in (1..250).rev() {
        closes[i - 1] = if rising { closes[i] - up } else { closes[i] + down };
        rising = !rising;
    }
    closes
}

pub struct CannedSource {
    response: Result<Vec<Candle>, FetchError>,
}

impl CannedSource {
    pub fn closes(closes: Vec<f64>) -> Self {
        let candles = closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| {
                let open_ms = i as i64 * 60_000;
                Candle {
                    open_time: Utc.timestamp_millis_opt(open_ms).unwrap(),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1.0,
                    close_time: Utc.timestamp_millis_opt(open_ms + 59_999).unwrap(),
                }
            })
            .collect();
        Self { response: Ok(candles) }
    }

    pub fn failing() -> Self {
        Self {
            response: Err(FetchError::Network("connection refused".into())),
        }
    }
}

#[async_trait]
impl CandleSource for CannedSource {
    async fn fetch_candles(
        &self,
        _symbol: &str,
        _interval: KlineInterval,
        _limit: usize,
    ) -> Result<Vec<Candle>, FetchError> {
        self.response.clone()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    fail: bool,
    delivered: Mutex<Vec<Alert>>,
    attempts: Mutex<usize>,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn delivered(&self) -> Vec<Alert> {
        self.delivered.lock().await.clone()
    }

    pub async fn attempts(&self) -> usize {
        *self.attempts.lock().await
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn deliver(&self, alert: &Alert) -> Result<()> {
        *self.attempts.lock().await += 1;
        if self.fail {
            return Err(Error::Telegram("chat not found".into()));
        }
        self.delivered.lock().await.push(alert.clone());
        Ok(())
    }
}
