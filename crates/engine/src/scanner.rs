use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

use common::{Alert, AlertPolicy, AlertSink, Analysis};

use crate::analyzer::MarketAnalyzer;

/// Periodic job: analyze the market and push whatever the alert policy lets
/// through.
pub struct Scanner {
    analyzer: Arc<MarketAnalyzer>,
    sink: Arc<dyn AlertSink>,
    policy: AlertPolicy,
    period: Duration,
    first_delay: Duration,
}

impl Scanner {
    pub fn new(
        analyzer: Arc<MarketAnalyzer>,
        sink: Arc<dyn AlertSink>,
        policy: AlertPolicy,
        period: Duration,
        first_delay: Duration,
    ) -> Self {
        Self {
            analyzer,
            sink,
            policy,
            period,
            first_delay,
        }
    }

    /// Run the scan loop forever. Call from `tokio::spawn`.
    ///
    /// A slow fetch delays the next tick instead of stacking scans.
    pub async fn run(self) {
        info!(
            symbol = %self.analyzer.market().symbol,
            period = ?self.period,
            first_delay = ?self.first_delay,
            window = ?self.policy.window,
            heartbeat = self.policy.heartbeat,
            "Scanner running"
        );

        let mut ticker = interval_at(Instant::now() + self.first_delay, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.scan(Utc::now()).await;
        }
    }

    /// One scan cycle at wall-clock time `now`. Returns the alerts that were
    /// handed to the sink (delivery failures are logged, not returned).
    pub async fn scan(&self, now: DateTime<Utc>) -> Vec<Alert> {
        let analysis = match self.analyzer.analyze().await {
            Ok(a) => a,
            Err(e) => {
                warn!(error = %e, "Scan skipped");
                return Vec::new();
            }
        };

        let alerts = self.alerts_for(&analysis, now.minute());
        for alert in &alerts {
            match self.sink.deliver(alert).await {
                Ok(()) => info!(?alert, "Alert delivered"),
                Err(e) => warn!(error = %e, "Failed to deliver alert"),
            }
        }
        alerts
    }

    fn alerts_for(&self, analysis: &Analysis, minute: u32) -> Vec<Alert> {
        let symbol = &self.analyzer.market().symbol;
        let mut alerts = Vec::new();

        if self.policy.is_heartbeat_minute(minute) {
            alerts.push(Alert::Heartbeat {
                symbol: symbol.clone(),
                price: analysis.price(),
                trend: analysis.trend,
                rsi: analysis.rsi(),
            });
        }

        if let Some(signal) = analysis.signal {
            if self.policy.in_window(minute) {
                alerts.push(Alert::Signal {
                    symbol: symbol.clone(),
                    signal,
                    risk_reward: self.analyzer.engine().params().risk_reward,
                });
            } else {
                info!(direction = %signal.direction, minute, "Signal outside alert window, not sent");
            }
        }

        alerts
    }
}
