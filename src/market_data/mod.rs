// =============================================================================
// Market Data Module
// =============================================================================
//
// Input-side data model: the validated OHLCV candle and the per-stream key.

pub mod candle;

// Re-export for convenient access (e.g. `use aurora_signals::market_data::Candle`).
pub use candle::{Candle, CandleKey};
