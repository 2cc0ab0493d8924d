// =============================================================================
// aurora-signals — causal indicator and market-structure engine
// =============================================================================
//
// Computes technical-analysis signals from ordered OHLCV candles for an
// external decision layer: stateful trend indicators, a volatility-regime
// classifier, a market-structure detector (order blocks, fair value gaps,
// liquidity grabs, BOS/CHoCH) and a confluence scorer.
//
// Every component honours a strict no-lookahead contract: output at candle
// i depends only on candles <= i, and feeding a full history at once is
// bit-identical to feeding candles one at a time.  Confirmed values never
// repaint.
//
// Typical use:
//
//   let mut engine = SignalEngine::new(&EngineConfig::default());
//   for candle in history {
//       let record = engine.process(&candle)?;
//       // hand record to the decision layer
//   }
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod market_data;
pub mod oscillators;
pub mod signals;
pub mod smoothing;
pub mod structure;
pub mod trend;
pub mod types;
pub mod volatility;
pub mod window;

pub use config::EngineConfig;
pub use engine::{EngineRegistry, SignalEngine, SignalRecord};
pub use error::EngineError;
pub use market_data::{Candle, CandleKey};
pub use signals::ConfluenceRecord;
pub use types::{Direction, Polarity, SwingKind, VolRegime, ZoneKind};
