pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::Ema;
pub use macd::{Macd, MacdValue};
pub use rsi::Rsi;
