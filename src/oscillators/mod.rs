// =============================================================================
// Oscillators Module
// =============================================================================
//
// Rolling-window oscillators with no cross-candle flip state:
// - WaveTrend (double-smoothed momentum with signal-line crosses)
// - Squeeze Momentum (Bollinger-inside-Keltner compression)
// - Choppiness Index (trendiness measure)
// - Williams VixFix (capitulation/panic gauge)

pub mod choppiness;
pub mod squeeze;
pub mod vixfix;
pub mod wavetrend;

pub use choppiness::Choppiness;
pub use squeeze::{SqueezeMomentum, SqueezeOutput};
pub use vixfix::{VixFix, VixFixOutput};
pub use wavetrend::{WaveTrend, WaveTrendOutput};
