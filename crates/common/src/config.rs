use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, KlineInterval, Result};

/// Binance rejects kline requests above this limit.
pub const MAX_CANDLE_LIMIT: usize = 1000;

/// All configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub telegram_token: String,
    pub chat_id: i64,
    /// Empty means commands are open to anyone who can reach the bot.
    pub telegram_allowed_user_ids: Vec<i64>,

    // Market data
    pub market: MarketConfig,
    pub binance_base_url: String,
    pub http_timeout: Duration,

    // Scheduling
    pub scan_interval: Duration,
    pub scan_first_delay: Duration,
    pub alert_policy: AlertPolicy,

    // Strategy parameter file path
    pub strategy_config_path: Option<String>,
}

/// What to watch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    pub symbol: String,
    pub interval: KlineInterval,
    /// Candle window length requested per fetch.
    pub limit: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            interval: KlineInterval::OneMinute,
            limit: 250,
        }
    }
}

/// When scanner alerts are allowed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPolicy {
    /// Inclusive minutes-past-the-hour range in which signal alerts are sent.
    /// `None` lets every minute through.
    pub window: Option<(u32, u32)>,
    /// Send a status heartbeat at minute 0 of every hour.
    pub heartbeat: bool,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            window: Some((30, 55)),
            heartbeat: false,
        }
    }
}

impl AlertPolicy {
    pub fn in_window(&self, minute: u32) -> bool {
        match self.window {
            Some((start, end)) => (start..=end).contains(&minute),
            None => true,
        }
    }

    pub fn is_heartbeat_minute(&self, minute: u32) -> bool {
        self.heartbeat && minute == 0
    }

    /// Parse `"30-55"` or `"off"`.
    pub fn parse_window(raw: &str) -> Result<Option<(u32, u32)>> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("off") {
            return Ok(None);
        }
        let (start, end) = raw
            .split_once('-')
            .ok_or_else(|| Error::Config(format!("ALERT_WINDOW must look like '30-55', got '{raw}'")))?;
        let start: u32 = parse_number("ALERT_WINDOW", start.trim())?;
        let end: u32 = parse_number("ALERT_WINDOW", end.trim())?;
        if start > end || end > 59 {
            return Err(Error::Config(format!(
                "ALERT_WINDOW minutes must satisfy start <= end <= 59, got '{raw}'"
            )));
        }
        Ok(Some((start, end)))
    }
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| {
                Error::Config(format!(
                    "Required environment variable '{key}' is not set. Check your .env file."
                ))
            })
        };

        let telegram_allowed_user_ids = match get("TELEGRAM_ALLOWED_USER_IDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_number::<i64>("TELEGRAM_ALLOWED_USER_IDS", s))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let interval = match get("CANDLE_INTERVAL") {
            Some(raw) => raw.parse::<KlineInterval>().map_err(Error::Config)?,
            None => KlineInterval::OneMinute,
        };

        let limit = optional_number(&get, "CANDLE_LIMIT", 250usize)?;
        if limit == 0 || limit > MAX_CANDLE_LIMIT {
            return Err(Error::Config(format!(
                "CANDLE_LIMIT must be between 1 and {MAX_CANDLE_LIMIT}, got {limit}"
            )));
        }

        let scan_interval_secs = optional_number(&get, "SCAN_INTERVAL_SECS", 60u64)?;
        if scan_interval_secs == 0 {
            return Err(Error::Config("SCAN_INTERVAL_SECS must be positive".into()));
        }

        let alert_policy = AlertPolicy {
            window: match get("ALERT_WINDOW") {
                Some(raw) => AlertPolicy::parse_window(&raw)?,
                None => AlertPolicy::default().window,
            },
            heartbeat: match get("HEARTBEAT") {
                Some(raw) => parse_bool("HEARTBEAT", &raw)?,
                None => false,
            },
        };

        Ok(Config {
            telegram_token: required("TELEGRAM_TOKEN")?,
            chat_id: parse_number("CHAT_ID", &required("CHAT_ID")?)?,
            telegram_allowed_user_ids,
            market: MarketConfig {
                symbol: get("SYMBOL")
                    .map(|s| s.trim().to_uppercase())
                    .unwrap_or_else(|| "BTCUSDT".to_string()),
                interval,
                limit,
            },
            binance_base_url: get("BINANCE_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.binance.com".to_string()),
            http_timeout: Duration::from_secs(optional_number(&get, "HTTP_TIMEOUT_SECS", 10u64)?),
            scan_interval: Duration::from_secs(scan_interval_secs),
            scan_first_delay: Duration::from_secs(optional_number(
                &get,
                "SCAN_FIRST_DELAY_SECS",
                10u64,
            )?),
            alert_policy,
            strategy_config_path: get("STRATEGY_CONFIG_PATH"),
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("{key} contains a non-numeric value: '{raw}'")))
}

fn optional_number<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_number(key, &raw),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("{key} must be a boolean, got '{other}'"))),
    }
}
