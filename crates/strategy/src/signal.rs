use tracing::debug;

use common::{
    Analysis, AnalysisError, Candle, Direction, IndicatorSnapshot, TradeSignal, Trend,
};

use crate::config::StrategyParams;
use crate::indicators::{Ema, Macd, Rsi};

/// Stateless triple-check evaluator.
///
/// A signal fires only when trend (close vs. EMA), momentum (MACD histogram
/// sign) and RSI band all agree. The same candle window always yields the
/// same `Analysis`.
#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    params: StrategyParams,
}

impl SignalEngine {
    pub fn new(params: StrategyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn analyze(&self, candles: &[Candle]) -> Result<Analysis, AnalysisError> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        self.analyze_closes(&closes)
    }

    /// Same as [`analyze`](Self::analyze) over a bare closing-price series.
    pub fn analyze_closes(&self, closes: &[f64]) -> Result<Analysis, AnalysisError> {
        let p = &self.params;
        let insufficient = || AnalysisError::Insufficient {
            required: p.min_candles(),
            available: closes.len(),
        };

        let ema_trend = Ema::new(p.ema_period).latest(closes).ok_or_else(insufficient)?;
        let rsi = Rsi::new(p.rsi_period).compute(closes).ok_or_else(insufficient)?;
        let macd_histogram = Macd::new(p.macd_fast, p.macd_slow, p.macd_signal)
            .histogram(closes)
            .ok_or_else(insufficient)?;
        let close = *closes.last().ok_or_else(insufficient)?;

        let snapshot = IndicatorSnapshot {
            close,
            ema_trend,
            rsi,
            macd_histogram,
        };
        let trend = if close > ema_trend {
            Trend::Bullish
        } else {
            Trend::Bearish
        };

        let direction = self.decide(&snapshot);
        debug!(
            close,
            ema_trend,
            rsi,
            macd_histogram,
            ?direction,
            "Triple-check evaluated"
        );

        Ok(Analysis {
            snapshot,
            trend,
            signal: direction.map(|d| self.levels(d, close, rsi)),
        })
    }

    fn decide(&self, s: &IndicatorSnapshot) -> Option<Direction> {
        let p = &self.params;
        if s.close > s.ema_trend && s.macd_histogram > 0.0 && p.long_rsi.contains(s.rsi) {
            Some(Direction::Long)
        } else if s.close < s.ema_trend && s.macd_histogram < 0.0 && p.short_rsi.contains(s.rsi) {
            Some(Direction::Short)
        } else {
            None
        }
    }

    fn levels(&self, direction: Direction, entry: f64, rsi: f64) -> TradeSignal {
        let stop_distance = entry * self.params.stop_loss_pct;
        let target_distance = stop_distance * self.params.risk_reward;
        let (stop_loss, take_profit) = match direction {
            Direction::Long => (entry - stop_distance, entry + target_distance),
            Direction::Short => (entry + stop_distance, entry - target_distance),
        };
        TradeSignal {
            direction,
            entry,
            stop_loss,
            take_profit,
            rsi,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::testing::{candles, zigzag};

    #[test]
    fn fewer_than_200_candles_is_insufficient() {
        let engine = SignalEngine::default();
        let closes = zigzag(199, 150.0, 1.0, 0.7);
        assert_eq!(
            engine.analyze(&candles(&closes)),
            Err(AnalysisError::Insufficient { required: 200, available: 199 })
        );
    }

    #[test]
    fn empty_window_is_insufficient() {
        assert!(matches!(
            SignalEngine::default().analyze(&[]),
            Err(AnalysisError::Insufficient { available: 0, .. })
        ));
    }

    #[test]
    fn rising_zigzag_fires_long_with_expected_levels() {
        let up = 50.0 / 38.2;
        let closes = zigzag(250, 150.0, up, up * 0.7);
        let analysis = SignalEngine::default().analyze(&candles(&closes)).unwrap();

        assert_eq!(analysis.trend, Trend::Bullish);
        assert!(analysis.snapshot.rsi > 50.0 && analysis.snapshot.rsi < 65.0);
        assert!(analysis.snapshot.macd_histogram > 0.0);

        let signal = analysis.signal.expect("expected a long signal");
        assert_eq!(signal.direction, Direction::Long);
        assert_relative_eq!(signal.entry, 150.0);
        assert_relative_eq!(signal.stop_loss, 149.4, epsilon = 1e-9);
        assert_relative_eq!(signal.take_profit, 151.2, epsilon = 1e-9);
        assert_relative_eq!(signal.rsi, analysis.snapshot.rsi);
    }

    #[test]
    fn falling_zigzag_fires_short_with_expected_levels() {
        let down = 50.0 / 38.2;
        let closes = zigzag(250, 100.0, -down, -down * 0.7);
        let analysis = SignalEngine::default().analyze(&candles(&closes)).unwrap();

        assert_eq!(analysis.trend, Trend::Bearish);
        let signal = analysis.signal.expect("expected a short signal");
        assert_eq!(signal.direction, Direction::Short);
        assert_relative_eq!(signal.entry, 100.0);
        assert_relative_eq!(signal.stop_loss, 100.4, epsilon = 1e-9);
        assert_relative_eq!(signal.take_profit, 99.2, epsilon = 1e-9);
    }

    #[test]
    fn steady_linear_rise_is_overbought_and_silent() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64 * 0.2).collect();
        let analysis = SignalEngine::default().analyze_closes(&closes).unwrap();
        assert_eq!(analysis.trend, Trend::Bullish);
        assert_relative_eq!(analysis.snapshot.rsi, 100.0);
        assert!(analysis.signal.is_none());
    }

    #[test]
    fn flat_series_yields_no_signal() {
        let analysis = SignalEngine::default().analyze_closes(&[100.0; 250]).unwrap();
        assert_relative_eq!(analysis.snapshot.rsi, 100.0);
        assert_relative_eq!(analysis.snapshot.macd_histogram, 0.0, epsilon = 1e-9);
        assert!(analysis.signal.is_none());
    }

    #[test]
    fn analysis_is_deterministic() {
        let up = 50.0 / 38.2;
        let window = candles(&zigzag(250, 150.0, up, up * 0.7));
        let engine = SignalEngine::default();
        assert_eq!(engine.analyze(&window), engine.analyze(&window));
    }

    #[test]
    fn custom_risk_reward_scales_target() {
        let params = StrategyParams {
            risk_reward: 3.0,
            ..StrategyParams::default()
        };
        let up = 50.0 / 38.2;
        let closes = zigzag(250, 150.0, up, up * 0.7);
        let signal = SignalEngine::new(params)
            .analyze_closes(&closes)
            .unwrap()
            .signal
            .unwrap();
        assert_relative_eq!(signal.take_profit, 150.0 + 0.6 * 3.0, epsilon = 1e-9);
    }

    #[test]
    fn rsi_outside_long_band_blocks_signal() {
        let params = StrategyParams {
            long_rsi: crate::config::RsiBand { lower: 61.0, upper: 65.0 },
            ..StrategyParams::default()
        };
        let up = 50.0 / 38.2;
        let closes = zigzag(250, 150.0, up, up * 0.7);
        let analysis = SignalEngine::new(params).analyze_closes(&closes).unwrap();
        assert_eq!(analysis.trend, Trend::Bullish);
        assert!(analysis.signal.is_none());
    }
}
