use std::sync::Arc;

use tracing::debug;

use common::{Analysis, CandleSource, MarketConfig, Result};
use strategy::SignalEngine;

/// Fetch-then-analyze for one configured market.
///
/// Cheap to share behind an `Arc`: the scanner job and the `/status` command
/// each call [`MarketAnalyzer::analyze`] independently and hold no mutable
/// state in common.
pub struct MarketAnalyzer {
    source: Arc<dyn CandleSource>,
    engine: SignalEngine,
    market: MarketConfig,
}

impl MarketAnalyzer {
    pub fn new(source: Arc<dyn CandleSource>, engine: SignalEngine, market: MarketConfig) -> Self {
        Self {
            source,
            engine,
            market,
        }
    }

    pub fn market(&self) -> &MarketConfig {
        &self.market
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    /// One fetch and one evaluation. Errors are per-call; nothing is retried.
    pub async fn analyze(&self) -> Result<Analysis> {
        let candles = self
            .source
            .fetch_candles(&self.market.symbol, self.market.interval, self.market.limit)
            .await?;
        let analysis = self.engine.analyze(&candles)?;
        debug!(
            symbol = %self.market.symbol,
            price = analysis.price(),
            trend = %analysis.trend,
            signal = ?analysis.signal.map(|s| s.direction),
            "Market analyzed"
        );
        Ok(analysis)
    }
}
