// =============================================================================
// Engine Error Taxonomy
// =============================================================================
//
// Three classes of failure, with different propagation policies:
//
// - InsufficientHistory: a component's rolling window is not yet full.
//   Recovered locally — the affected output fields are `None`; this variant
//   never crosses the public API.
// - DegenerateDivision: a formula hit a zero divisor (flat range, zero
//   standard deviation).  Recovered locally with the documented neutral
//   default for that field.
// - DataQuality: a malformed candle (NaN/negative OHLC, non-monotonic
//   timestamps, zero volume with nonzero price).  Surfaced to the caller and
//   the stream is halted; proceeding would corrupt every stateful component
//   downstream.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Fewer candles than a component's required window.  Recovered locally;
    /// present in the taxonomy for internal signalling and tests.
    #[error("insufficient history: {needed} candles required, {available} available")]
    InsufficientHistory { needed: usize, available: usize },

    /// A zero divisor was substituted with a neutral default.  Recovered
    /// locally; never returned across the public API.
    #[error("degenerate division in {context}, neutral default substituted")]
    DegenerateDivision { context: &'static str },

    /// Malformed input candle.  Halts processing for the stream.
    #[error("data quality violation at candle {index}: {detail}")]
    DataQuality { index: usize, detail: String },

    /// The stream was previously halted by a DataQuality error and cannot
    /// accept further candles.
    #[error("stream poisoned by earlier data-quality violation at candle {index}")]
    StreamPoisoned { index: usize },
}

impl EngineError {
    /// True for the variants that must stop the stream rather than degrade
    /// into a default value.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::DataQuality { .. } | EngineError::StreamPoisoned { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatality_split() {
        assert!(EngineError::DataQuality {
            index: 3,
            detail: "negative low".into()
        }
        .is_fatal());
        assert!(EngineError::StreamPoisoned { index: 3 }.is_fatal());
        assert!(!EngineError::InsufficientHistory {
            needed: 14,
            available: 2
        }
        .is_fatal());
        assert!(!EngineError::DegenerateDivision { context: "choppiness" }.is_fatal());
    }

    #[test]
    fn display_carries_detail() {
        let err = EngineError::DataQuality {
            index: 7,
            detail: "non-monotonic open_time".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("candle 7"));
        assert!(msg.contains("non-monotonic"));
    }
}
