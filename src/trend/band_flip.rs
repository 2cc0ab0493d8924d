// =============================================================================
// Band-Flip Core — shared ratcheting band state machine
// =============================================================================
//
// SuperTrend and HalfTrend share one mechanism: raw upper/lower bands are
// computed from price and ATR each candle, but the *effective* bands ratchet
// in the trend's favour and the direction only flips when the close trades
// through the previous effective opposite band.
//
// Per candle, in order:
//   1. Flip check against the PREVIOUS effective bands:
//        bearish -> bullish when close > prev effective upper band
//        bullish -> bearish when close < prev effective lower band
//   2. Band update:
//        on a flip candle the raw bands are adopted as-is;
//        otherwise, while bullish both effective bands only move up
//        (max with previous), while bearish only down (min with previous).
//   3. Published line = lower band while bullish, upper band while bearish.
//
// The ratchet makes the published band insensitive to a single adverse bar:
// while bullish it is non-decreasing until a flip candle.
// =============================================================================

use crate::types::Direction;

/// One step's output from the band-flip core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandFlipStep {
    pub direction: Direction,
    /// Active band: lower while bullish, upper while bearish.
    pub line: f64,
    /// True when the direction changed on this candle.
    pub flipped: bool,
}

// =============================================================================
// BandFlipCore
// =============================================================================

#[derive(Debug, Clone)]
pub struct BandFlipCore {
    upper: f64,
    lower: f64,
    direction: Direction,
    seeded: bool,
}

impl Default for BandFlipCore {
    fn default() -> Self {
        Self::new()
    }
}

impl BandFlipCore {
    /// Seed state: bullish until the first candle proves otherwise.
    pub fn new() -> Self {
        Self {
            upper: 0.0,
            lower: 0.0,
            direction: Direction::Bullish,
            seeded: false,
        }
    }

    /// Advance one candle with freshly computed raw bands.
    pub fn step(&mut self, close: f64, raw_upper: f64, raw_lower: f64) -> BandFlipStep {
        if !self.seeded {
            // First computable candle: adopt the raw bands, keep the seed
            // direction.
            self.upper = raw_upper;
            self.lower = raw_lower;
            self.seeded = true;
            return BandFlipStep {
                direction: self.direction,
                line: self.active_line(),
                flipped: false,
            };
        }

        // 1. Flip against the previous effective bands.
        let flipped = match self.direction {
            Direction::Bearish if close > self.upper => {
                self.direction = Direction::Bullish;
                true
            }
            Direction::Bullish if close < self.lower => {
                self.direction = Direction::Bearish;
                true
            }
            _ => false,
        };

        // 2. Band update.
        if flipped {
            self.upper = raw_upper;
            self.lower = raw_lower;
        } else {
            match self.direction {
                Direction::Bullish => {
                    self.upper = raw_upper.max(self.upper);
                    self.lower = raw_lower.max(self.lower);
                }
                Direction::Bearish => {
                    self.upper = raw_upper.min(self.upper);
                    self.lower = raw_lower.min(self.lower);
                }
            }
        }

        BandFlipStep {
            direction: self.direction,
            line: self.active_line(),
            flipped,
        }
    }

    fn active_line(&self) -> f64 {
        match self.direction {
            Direction::Bullish => self.lower,
            Direction::Bearish => self.upper,
        }
    }
}
