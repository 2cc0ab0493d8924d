// =============================================================================
// Structure Breaks — BOS and CHoCH against confirmed swing levels
// =============================================================================
//
// Tracks the last confirmed swing high/low.  A close beyond a level that was
// not already beyond it is a break; each level can break at most once and is
// re-armed only when a new confirmed swing replaces it.
//
// Classification depends on the running trend estimate, derived from
// higher-high / lower-low counts over the recent swing sequence:
//   break WITH the trend (or no trend yet)  -> BOS   (continuation)
//   break AGAINST the trend                 -> CHoCH (reversal, stronger)
// =============================================================================

use std::collections::VecDeque;

use tracing::debug;

use crate::structure::swings::SwingPoint;
use crate::types::{Polarity, SwingKind};

/// Swings of each kind kept for the trend estimate.
const TREND_MEMORY: usize = 4;

/// Break flags for one candle.  Both `None` on a quiet candle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BreakEvent {
    pub bos: Option<Polarity>,
    pub choch: Option<Polarity>,
}

// =============================================================================
// BreakDetector
// =============================================================================

#[derive(Debug, Clone)]
pub struct BreakDetector {
    last_high: Option<f64>,
    high_broken: bool,
    last_low: Option<f64>,
    low_broken: bool,
    recent_highs: VecDeque<f64>,
    recent_lows: VecDeque<f64>,
}

impl Default for BreakDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakDetector {
    pub fn new() -> Self {
        Self {
            last_high: None,
            high_broken: false,
            last_low: None,
            low_broken: false,
            recent_highs: VecDeque::with_capacity(TREND_MEMORY + 1),
            recent_lows: VecDeque::with_capacity(TREND_MEMORY + 1),
        }
    }

    /// Register a newly confirmed swing; replaces the tracked level and
    /// re-arms it.
    pub fn on_swing(&mut self, swing: &SwingPoint) {
        match swing.kind {
            SwingKind::High => {
                self.last_high = Some(swing.price);
                self.high_broken = false;
                self.recent_highs.push_back(swing.price);
                if self.recent_highs.len() > TREND_MEMORY {
                    self.recent_highs.pop_front();
                }
            }
            SwingKind::Low => {
                self.last_low = Some(swing.price);
                self.low_broken = false;
                self.recent_lows.push_back(swing.price);
                if self.recent_lows.len() > TREND_MEMORY {
                    self.recent_lows.pop_front();
                }
            }
        }
    }

    /// Trend estimate from the swing sequence: +1 up, -1 down, 0 undecided.
    fn trend_estimate(&self) -> i8 {
        let rising = |seq: &VecDeque<f64>| {
            seq.iter()
                .zip(seq.iter().skip(1))
                .filter(|(a, b)| b > a)
                .count() as i32
        };
        let falling = |seq: &VecDeque<f64>| {
            seq.iter()
                .zip(seq.iter().skip(1))
                .filter(|(a, b)| b < a)
                .count() as i32
        };

        // Higher highs and higher lows vote up; lower highs and lower lows
        // vote down.
        let up = rising(&self.recent_highs) + rising(&self.recent_lows);
        let down = falling(&self.recent_highs) + falling(&self.recent_lows);
        (up - down).signum() as i8
    }

    /// Evaluate this candle's close against the tracked levels.
    pub fn on_close(&mut self, close: f64) -> BreakEvent {
        let mut event = BreakEvent::default();

        if let Some(level) = self.last_high {
            if !self.high_broken && close > level {
                self.high_broken = true;
                let trend = self.trend_estimate();
                if trend >= 0 {
                    event.bos = Some(Polarity::Bullish);
                } else {
                    event.choch = Some(Polarity::Bullish);
                }
                debug!(level, close, trend, "bullish structure break");
            }
        }

        if let Some(level) = self.last_low {
            if !self.low_broken && close < level {
                self.low_broken = true;
                let trend = self.trend_estimate();
                if trend <= 0 {
                    event.bos = Some(Polarity::Bearish);
                } else {
                    event.choch = Some(Polarity::Bearish);
                }
                debug!(level, close, trend, "bearish structure break");
            }
        }

        event
    }
}
