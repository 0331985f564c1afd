pub mod config;
pub mod indicators;
pub mod signal;

pub use config::{RsiBand, StrategyParams};
pub use signal::SignalEngine;

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{TimeZone, Utc};

    use common::Candle;

    /// Alternating up/down steps walking backwards from `last`, so the final
    /// close is exactly `last` and the final move is `+up`.
    pub fn zigzag(n: usize, last: f64, up: f64, down: f64) -> Vec<f64> {
        let mut closes = vec![0.0; n];
        if n == 0 {
            return closes;
        }
        closes[n - 1] = last;
        let mut rising = true;
        for i in (1..n).rev() {
            closes[i - 1] = if rising { closes[i] - up } else { closes[i] + down };
            rising = !rising;
        }
        closes
    }

    pub fn candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
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
            .collect()
    }
}
