// =============================================================================
// Trend Module — causal trend state machines
// =============================================================================
//
// Four stateful indicators whose output at candle i depends on their own
// state at i-1, never on any future candle:
// - SuperTrend and HalfTrend share the band-flip core (ratcheting ATR bands,
//   direction flips only on a close through the opposite band)
// - AlphaTrend gates an ATR ratchet on the Money Flow Index
// - QQE runs the same flip pattern on a smoothed RSI instead of price
//
// Each seeds from raw price/bands over its warmup window and reports `None`
// (or partial fields) until then.

pub mod alphatrend;
pub mod band_flip;
pub mod halftrend;
pub mod qqe;
pub mod supertrend;

pub use alphatrend::{AlphaTrend, AlphaTrendOutput};
pub use band_flip::{BandFlipCore, BandFlipStep};
pub use halftrend::HalfTrend;
pub use qqe::{Qqe, QqeOutput};
pub use supertrend::SuperTrend;

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Common output shape for the price-band trend machines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendOutput {
    pub direction: Direction,
    /// Published band: support while bullish, resistance while bearish.
    pub line: f64,
    /// True when the direction changed on this candle.
    pub flipped: bool,
}
