use serde::{Deserialize, Serialize};

use common::{Error, Result};

/// Tunable constants of the triple-check rule.
///
/// Every field is optional in the TOML file. Example
/// `config/strategy.toml`:
/// ```toml
/// ema_period = 200
/// rsi_period = 14
/// stop_loss_pct = 0.004
/// risk_reward = 2.0
///
/// [long_rsi]
/// lower = 50.0
/// upper = 65.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyParams {
    /// Trend filter EMA period.
    pub ema_period: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// Exclusive RSI band a long setup must sit in.
    pub long_rsi: RsiBand,
    /// Exclusive RSI band a short setup must sit in.
    pub short_rsi: RsiBand,
    /// Stop distance as a fraction of entry (0.004 = 0.4%).
    pub stop_loss_pct: f64,
    /// Target distance as a multiple of the stop distance.
    pub risk_reward: f64,
}

/// Open interval `(lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RsiBand {
    pub lower: f64,
    pub upper: f64,
}

impl RsiBand {
    pub fn contains(&self, rsi: f64) -> bool {
        self.lower < rsi && rsi < self.upper
    }
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            ema_period: 200,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            long_rsi: RsiBand { lower: 50.0, upper: 65.0 },
            short_rsi: RsiBand { lower: 35.0, upper: 50.0 },
            stop_loss_pct: 0.004,
            risk_reward: 2.0,
        }
    }
}

impl StrategyParams {
    /// Load from a TOML file and validate.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read strategy config at '{path}': {e}"))
        })?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("Failed to parse strategy config at '{path}': {e}")))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let params: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ema_period == 0 || self.rsi_period < 2 {
            return Err(Error::Config(
                "ema_period must be positive and rsi_period must be >= 2".into(),
            ));
        }
        if self.macd_fast == 0 || self.macd_signal == 0 || self.macd_fast >= self.macd_slow {
            return Err(Error::Config(
                "MACD periods must be positive with macd_fast < macd_slow".into(),
            ));
        }
        for (name, band) in [("long_rsi", self.long_rsi), ("short_rsi", self.short_rsi)] {
            if !(0.0..=100.0).contains(&band.lower)
                || !(0.0..=100.0).contains(&band.upper)
                || band.lower >= band.upper
            {
                return Err(Error::Config(format!(
                    "{name} must satisfy 0 <= lower < upper <= 100"
                )));
            }
        }
        if !(self.stop_loss_pct > 0.0 && self.stop_loss_pct < 1.0) {
            return Err(Error::Config("stop_loss_pct must be in (0, 1)".into()));
        }
        if !(self.risk_reward > 0.0 && self.risk_reward.is_finite()) {
            return Err(Error::Config("risk_reward must be positive".into()));
        }
        Ok(())
    }

    /// Fewest candles for every indicator to be defined at the last index.
    pub fn min_candles(&self) -> usize {
        self.ema_period
            .max(self.rsi_period + 1)
            .max(self.macd_slow + self.macd_signal - 1)
    }

    /// Reject a fetch window too short to ever produce a decision.
    pub fn check_window(&self, limit: usize) -> Result<()> {
        let required = self.min_candles();
        if limit < required {
            return Err(Error::Config(format!(
                "CANDLE_LIMIT {limit} is below the {required} candles the indicators need"
            )));
        }
        Ok(())
    }
}
