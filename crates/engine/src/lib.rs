pub mod analyzer;
pub mod binance;
pub mod scanner;
pub mod status;

#[cfg(test)]
mod testing;

pub use analyzer::MarketAnalyzer;
pub use binance::BinanceClient;
pub use scanner::Scanner;
pub use status::{Health, StatusReport};
