use async_trait::async_trait;

use crate::{Alert, Candle, FetchError, KlineInterval, Result};

/// Abstraction over the market data provider.
///
/// `BinanceClient` implements this against the public REST API; tests swap in
/// a canned source.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch the most recent `limit` candles, oldest first.
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: usize,
    ) -> Result<Vec<Candle>, FetchError>;
}

/// Outbound delivery of scanner alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, alert: &Alert) -> Result<()>;
}
