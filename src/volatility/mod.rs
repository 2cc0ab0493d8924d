// =============================================================================
// Volatility Module
// =============================================================================
//
// The leaf of the dependency graph: True Range, ATR and the volatility
// regime classifier.  Every trend machine and several oscillators consume
// the ATR produced here.

pub mod regime;
pub mod true_range;

pub use regime::{RegimeReading, RegimeState};
pub use true_range::{true_range, AtrState};
