pub mod config;
pub mod error;
pub mod exchange;
pub mod types;

pub use config::{AlertPolicy, Config, MarketConfig};
pub use error::{AnalysisError, Error, FetchError, Result};
pub use exchange::{AlertSink, CandleSource};
pub use types::*;
