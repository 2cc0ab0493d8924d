// =============================================================================
// QQE — Quantitative Qualitative Estimation (smoothed-RSI band flip)
// =============================================================================
//
// Pipeline:
//   rsi      = Wilder RSI(close, rsi_period)
//   rsi_ma   = EMA(rsi, smoothing)
//   dar      = EMA(EMA(|Δrsi_ma|, wilders), wilders) * factor,
//              wilders = 2 * rsi_period - 1
//
// Two dynamic bands tighten around rsi_ma in the trend's direction:
//   long band  ratchets up while rsi_ma holds above it   (max with previous)
//   short band ratchets down while rsi_ma holds below it (min with previous)
//
// Direction flips bullish when rsi_ma crosses above the previous short band
// and bearish when it crosses below the previous long band.  The published
// line is the active band: long while bullish, short while bearish.
//
// The seed direction comes from the oscillator's side of the neutral 50
// midline.  Seeding bullish unconditionally would trap a stream that warms
// up in a downtrend: the long band freezes below the RSI floor of 0 and a
// bearish cross becomes unreachable.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::QqeParams;
use crate::smoothing::{EmaState, WilderRsiState};
use crate::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QqeOutput {
    /// Smoothed RSI (the oscillator the bands track).
    pub rsi_ma: f64,
    /// Active band: long while bullish, short while bearish.
    pub line: f64,
    pub direction: Direction,
    pub flipped: bool,
}

// =============================================================================
// Qqe
// =============================================================================

#[derive(Debug, Clone)]
pub struct Qqe {
    factor: f64,
    rsi: WilderRsiState,
    rsi_smoother: EmaState,
    dar_inner: EmaState,
    dar_outer: EmaState,
    prev_rsi_ma: Option<f64>,
    bands: Option<Bands>,
}

#[derive(Debug, Clone, Copy)]
struct Bands {
    long: f64,
    short: f64,
    direction: Direction,
}

impl Qqe {
    pub fn new(params: &QqeParams) -> Self {
        let wilders = 2 * params.rsi_period.max(1) - 1;
        Self {
            factor: params.factor,
            rsi: WilderRsiState::new(params.rsi_period),
            rsi_smoother: EmaState::new(params.smoothing),
            dar_inner: EmaState::new(wilders),
            dar_outer: EmaState::new(wilders),
            prev_rsi_ma: None,
            bands: None,
        }
    }

    /// Feed one close; `None` until the full smoothing chain has warmed up.
    pub fn update(&mut self, close: f64) -> Option<QqeOutput> {
        let rsi = self.rsi.update(close)?;
        let rsi_ma = self.rsi_smoother.update(rsi)?;

        let prev_rsi_ma = self.prev_rsi_ma.replace(rsi_ma);
        let prev_rsi_ma = match prev_rsi_ma {
            Some(p) => p,
            None => return None, // Need a delta before the band width exists.
        };

        let dar = self
            .dar_inner
            .update((rsi_ma - prev_rsi_ma).abs())
            .and_then(|inner| self.dar_outer.update(inner))?
            * self.factor;

        let new_long = rsi_ma - dar;
        let new_short = rsi_ma + dar;

        let bands = match self.bands {
            None => {
                // First computable candle: adopt raw bands and start on the
                // side of the neutral midline the oscillator is already on.
                let direction = if rsi_ma >= 50.0 {
                    Direction::Bullish
                } else {
                    Direction::Bearish
                };
                let seeded = Bands {
                    long: new_long,
                    short: new_short,
                    direction,
                };
                self.bands = Some(seeded);
                return Some(QqeOutput {
                    rsi_ma,
                    line: match direction {
                        Direction::Bullish => seeded.long,
                        Direction::Bearish => seeded.short,
                    },
                    direction,
                    flipped: false,
                });
            }
            Some(b) => b,
        };

        // Flip against the previous bands before updating them.
        let (direction, flipped) = match bands.direction {
            Direction::Bearish if prev_rsi_ma <= bands.short && rsi_ma > bands.short => {
                (Direction::Bullish, true)
            }
            Direction::Bullish if prev_rsi_ma >= bands.long && rsi_ma < bands.long => {
                (Direction::Bearish, true)
            }
            d => (d, false),
        };

        // Band ratchet: hold the tighter band while rsi_ma stays on its side.
        let long = if prev_rsi_ma > bands.long && rsi_ma > bands.long {
            bands.long.max(new_long)
        } else {
            new_long
        };
        let short = if prev_rsi_ma < bands.short && rsi_ma < bands.short {
            bands.short.min(new_short)
        } else {
            new_short
        };

        let updated = Bands {
            long,
            short,
            direction,
        };
        self.bands = Some(updated);

        if flipped {
            debug!(direction = %direction, rsi_ma, "qqe flip");
        }

        let line = match direction {
            Direction::Bullish => long,
            Direction::Bearish => short,
        };

        Some(QqeOutput {
            rsi_ma,
            line,
            direction,
            flipped,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn make() -> Qqe {
        // Short periods keep the warmup manageable in tests.
        Qqe::new(&QqeParams {
            rsi_period: 3,
            smoothing: 2,
            factor: 4.238,
        })
    }

    /// Zig-zag closes with a drift; enough variation to keep dar nonzero.
    fn wavy(n: usize, drift: f64) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + drift * i as f64 + if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect()
    }

    #[test]
    fn none_during_warmup() {
        let mut qqe = make();
        // rsi needs 4 closes, rsi_ma 2 more values, dar chain 2 * wilders(5).
        let mut first_some = None;
        for (i, c) in wavy(40, 0.5).into_iter().enumerate() {
            if qqe.update(c).is_some() && first_some.is_none() {
                first_some = Some(i);
            }
        }
        let idx = first_some.expect("warms up within 40 candles");
        assert!(idx > 5, "warmup too short: first output at {idx}");
    }

    #[test]
    fn uptrend_reports_bullish() {
        let mut qqe = make();
        let mut last = None;
        for c in wavy(60, 1.0) {
            if let Some(out) = qqe.update(c) {
                last = Some(out);
            }
        }
        let out = last.unwrap();
        assert_eq!(out.direction, Direction::Bullish);
        assert!(out.rsi_ma > 50.0);
        // Long band sits below the oscillator while bullish.
        assert!(out.line < out.rsi_ma);
    }

    #[test]
    fn downtrend_reports_bearish() {
        // A stream whose entire warmup happens in a falling tape must seed
        // bearish and stay there: every output reports the short band above
        // the oscillator.
        let mut qqe = make();
        let mut outputs = Vec::new();
        for c in wavy(60, -1.0) {
            if let Some(out) = qqe.update(c) {
                outputs.push(out);
            }
        }
        assert!(!outputs.is_empty());
        for out in &outputs {
            assert_eq!(out.direction, Direction::Bearish);
            assert!(out.line > out.rsi_ma);
        }
    }

    #[test]
    fn reversal_flips_exactly_once() {
        let mut qqe = make();
        for c in wavy(60, 1.0) {
            qqe.update(c);
        }
        // Hard reversal downward.
        let mut flips = 0;
        let mut last_dir = None;
        for i in 0..40 {
            let c = 160.0 - 2.0 * i as f64 + if i % 2 == 0 { 0.5 } else { -0.5 };
            if let Some(out) = qqe.update(c) {
                if out.flipped {
                    flips += 1;
                }
                last_dir = Some(out.direction);
            }
        }
        assert_eq!(last_dir, Some(Direction::Bearish));
        assert_eq!(flips, 1, "expected a single flip on the reversal");
    }
}
