// =============================================================================
// Order Blocks — the last opposite candle before an impulsive move
// =============================================================================
//
// An impulse is declared when either:
//   - `impulse_candles` (default 3) consecutive same-direction candles occur, or
//   - a single candle's body moves at least `impulse_pct` (default 2%) of its
//     open.
//
// The order-block zone is the high/low range of the last opposite-coloured
// candle immediately preceding the impulse.  A run whose preceding candle is
// not opposite-coloured (or is a doji) produces no block.
// =============================================================================

use crate::config::StructureParams;
use crate::market_data::Candle;
use crate::structure::zones::Zone;
use crate::types::{Polarity, ZoneKind};

#[derive(Debug, Clone, Copy, PartialEq)]
struct AnchorCandle {
    index: usize,
    high: f64,
    low: f64,
}

// =============================================================================
// OrderBlockDetector
// =============================================================================

#[derive(Debug, Clone)]
pub struct OrderBlockDetector {
    impulse_candles: usize,
    impulse_pct: f64,
    /// Colour of the current same-direction run (None after a doji).
    run_bullish: Option<bool>,
    run_len: usize,
    /// Opposite-coloured candle immediately before the current run.
    anchor: Option<AnchorCandle>,
    prev: Option<(AnchorCandle, Option<bool>)>,
}

impl OrderBlockDetector {
    pub fn new(params: &StructureParams) -> Self {
        Self {
            impulse_candles: params.impulse_candles.max(1),
            impulse_pct: params.impulse_pct,
            run_bullish: None,
            run_len: 0,
            anchor: None,
            prev: None,
        }
    }

    /// Feed one candle; returns a proposed zone when an impulse with a valid
    /// anchor completes (the arena deduplicates repeated proposals).
    pub fn update(&mut self, index: usize, candle: &Candle) -> Option<Zone> {
        let color = if candle.is_bullish() {
            Some(true)
        } else if candle.is_bearish() {
            Some(false)
        } else {
            None // Doji: breaks any run.
        };

        match (color, self.run_bullish) {
            (Some(c), Some(r)) if c == r => {
                self.run_len += 1;
            }
            (Some(c), _) => {
                // New run: the previous candle anchors it only if it is
                // opposite-coloured.
                self.anchor = match self.prev {
                    Some((cand, Some(prev_color))) if prev_color != c => Some(cand),
                    _ => None,
                };
                self.run_bullish = Some(c);
                self.run_len = 1;
            }
            (None, _) => {
                self.run_bullish = None;
                self.run_len = 0;
                self.anchor = None;
            }
        }

        let zone = match (color, self.anchor) {
            (Some(bullish), Some(anchor)) => {
                let run_impulse = self.run_len >= self.impulse_candles;
                let body_impulse = candle.open > 0.0
                    && (candle.close - candle.open).abs() / candle.open >= self.impulse_pct;
                if run_impulse || body_impulse {
                    let polarity = if bullish {
                        Polarity::Bullish
                    } else {
                        Polarity::Bearish
                    };
                    Some(Zone::new(
                        ZoneKind::OrderBlock,
                        polarity,
                        anchor.high,
                        anchor.low,
                        anchor.index,
                    ))
                } else {
                    None
                }
            }
            _ => None,
        };

        self.prev = Some((
            AnchorCandle {
                index,
                high: candle.high,
                low: candle.low,
            },
            color,
        ));

        zone
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, close: f64, high: f64, low: f64) -> Candle {
        Candle {
            open_time: 0,
            open,
            high,
            low,
            close,
            volume: 1.0,
            close_time: 0,
        }
    }

    fn detector() -> OrderBlockDetector {
        OrderBlockDetector::new(&StructureParams::default())
    }

    #[test]
    fn three_candle_impulse_anchors_preceding_bearish_candle() {
        let mut det = detector();
        // Bearish anchor candle at index 0.
        assert!(det.update(0, &candle(102.0, 100.0, 102.5, 99.5)).is_none());
        // Three small bullish candles (below the 2% body threshold).
        assert!(det.update(1, &candle(100.0, 101.0, 101.5, 99.8)).is_none());
        assert!(det.update(2, &candle(101.0, 102.0, 102.5, 100.8)).is_none());
        let zone = det
            .update(3, &candle(102.0, 103.0, 103.5, 101.8))
            .expect("impulse completes on the third bullish candle");
        assert_eq!(zone.polarity, Polarity::Bullish);
        assert_eq!(zone.created_at, 0);
        assert!((zone.top - 102.5).abs() < 1e-12);
        assert!((zone.bottom - 99.5).abs() < 1e-12);
    }

    #[test]
    fn single_large_candle_is_an_impulse() {
        let mut det = detector();
        det.update(0, &candle(102.0, 100.0, 102.5, 99.5)); // bearish anchor
        let zone = det
            .update(1, &candle(100.0, 103.0, 103.5, 99.8)) // 3% body
            .expect("body impulse");
        assert_eq!(zone.polarity, Polarity::Bullish);
        assert_eq!(zone.created_at, 0);
    }

    #[test]
    fn run_without_opposite_anchor_produces_nothing() {
        let mut det = detector();
        // All bullish from the start: no opposite candle to anchor on.
        for i in 0..6 {
            let base = 100.0 + i as f64;
            assert!(det
                .update(i, &candle(base, base + 1.0, base + 1.2, base - 0.2))
                .is_none());
        }
    }

    #[test]
    fn bearish_impulse_anchors_preceding_bullish_candle() {
        let mut det = detector();
        det.update(0, &candle(100.0, 102.0, 102.5, 99.5)); // bullish anchor
        det.update(1, &candle(102.0, 101.0, 102.2, 100.8));
        det.update(2, &candle(101.0, 100.0, 101.2, 99.8));
        let zone = det
            .update(3, &candle(100.0, 99.0, 100.2, 98.8))
            .expect("bearish impulse");
        assert_eq!(zone.polarity, Polarity::Bearish);
        assert_eq!(zone.created_at, 0);
    }

    #[test]
    fn doji_breaks_the_run() {
        let mut det = detector();
        det.update(0, &candle(102.0, 100.0, 102.5, 99.5)); // bearish anchor
        det.update(1, &candle(100.0, 101.0, 101.5, 99.8));
        det.update(2, &candle(101.0, 101.0, 101.5, 100.5)); // doji
        assert!(det.update(3, &candle(101.0, 102.0, 102.5, 100.8)).is_none());
        assert!(det.update(4, &candle(102.0, 103.0, 103.5, 101.8)).is_none());
    }
}
