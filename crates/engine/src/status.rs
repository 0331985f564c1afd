use std::time::{Duration, Instant};

use tracing::warn;

use common::Trend;

use crate::analyzer::MarketAnalyzer;

#[derive(Debug, Clone, PartialEq)]
pub enum Health {
    Operational,
    /// Fetch or analysis failed; carries the reason shown to the operator.
    Degraded(String),
}

/// Live snapshot for the `/status` command.
///
/// Never fails: market fields are `None` when the fetch or analysis did not
/// succeed, and `health` says why.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub symbol: String,
    pub price: Option<f64>,
    pub trend: Option<Trend>,
    pub rsi: Option<f64>,
    pub health: Health,
    pub uptime: Duration,
}

impl StatusReport {
    pub async fn collect(analyzer: &MarketAnalyzer, started_at: Instant) -> Self {
        let symbol = analyzer.market().symbol.clone();
        let uptime = started_at.elapsed();

        match analyzer.analyze().await {
            Ok(analysis) => Self {
                symbol,
                price: Some(analysis.price()),
                trend: Some(analysis.trend),
                rsi: Some(analysis.rsi()),
                health: Health::Operational,
                uptime,
            },
            Err(e) => {
                warn!(error = %e, "Status check degraded");
                Self {
                    symbol,
                    price: None,
                    trend: None,
                    rsi: None,
                    health: Health::Degraded(e.to_string()),
                    uptime,
                }
            }
        }
    }
}
