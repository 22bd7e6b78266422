// Technical indicators module
// Each calculator returns a series aligned 1:1 with its input

pub mod macd;
pub mod moving_averages;
pub mod rsi;

pub use macd::MACD;
pub use moving_averages::EMA;
pub use rsi::RSI;
