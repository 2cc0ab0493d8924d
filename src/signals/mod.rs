// =============================================================================
// Signals Module
// =============================================================================
//
// The confluence scorer: merges trend directions, regime and structural
// flags into bull/bear counts, weighted scores and the position-size
// multiplier handed to the external decision layer.

pub mod confluence;

pub use confluence::{ConfluenceInput, ConfluenceRecord, ConfluenceScorer};
