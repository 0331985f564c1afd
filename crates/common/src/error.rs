use thiserror::Error;

/// Failure to obtain a candle window from the market data provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("bad payload: {0}")]
    BadPayload(String),
}

/// The candle window cannot support a decision.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient history: need {required} candles, got {available}")]
    Insufficient { required: usize, available: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Telegram error: {0}")]
    Telegram(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
