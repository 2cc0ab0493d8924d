// =============================================================================
// Fair Value Gaps — 3-candle inefficiency zones
// =============================================================================
//
// Bullish FVG at candle i: low[i] > high[i-2] — the middle candle moved so
// fast that a gap of untraded prices remains between the outer candles.
// Bearish FVG: high[i] < low[i-2].  The zone spans the two outer extremes
// and is attributed to the middle candle (i-1).
// =============================================================================

use crate::market_data::Candle;
use crate::structure::zones::Zone;
use crate::types::{Polarity, ZoneKind};

#[derive(Debug, Clone, Default)]
pub struct FvgDetector {
    /// (high, low) of the previous candle and the one before it.
    prev: Option<(f64, f64)>,
    prev2: Option<(f64, f64)>,
}

impl FvgDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed candle `index`; returns a gap zone when the 3-candle pattern
    /// completes on this candle.
    pub fn update(&mut self, index: usize, candle: &Candle) -> Option<Zone> {
        let zone = match (self.prev2, self.prev) {
            (Some((high2, low2)), Some(_)) => {
                if candle.low > high2 {
                    // Middle candle is at index - 1.
                    Some(Zone::new(
                        ZoneKind::FairValueGap,
                        Polarity::Bullish,
                        candle.low,
                        high2,
                        index - 1,
                    ))
                } else if candle.high < low2 {
                    Some(Zone::new(
                        ZoneKind::FairValueGap,
                        Polarity::Bearish,
                        low2,
                        candle.high,
                        index - 1,
                    ))
                } else {
                    None
                }
            }
            _ => None,
        };

        self.prev2 = self.prev;
        self.prev = Some((candle.high, candle.low));
        zone
    }
}
