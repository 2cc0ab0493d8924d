// =============================================================================
// AlphaTrend — MFI-gated ATR ratchet with a delayed signal line
// =============================================================================
//
// A momentum gate (Money Flow Index, 0–100, neutral 50) selects which ATR
// band the line ratchets toward:
//
//   gate >= 50:  line = max(low  - coeff * ATR, prev_line)   (support)
//   gate <  50:  line = min(high + coeff * ATR, prev_line)   (resistance)
//
// The line is seeded with the raw close while the ATR window fills.  The
// signal line is the main line delayed by two candles; direction is bullish
// while the main line is above the delayed line.  Direction is undefined
// until the delay buffer holds a post-seed value.
//
// MFI degenerate cases: zero negative flow with positive flow => 100; both
// flows zero (flat tape) => 50 neutral.
// =============================================================================

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::AlphaTrendParams;
use crate::market_data::Candle;
use crate::types::Direction;
use crate::volatility::AtrState;
use crate::window::RollingWindow;

/// Number of candles the signal line lags the main line.
const SIGNAL_DELAY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaTrendOutput {
    /// Main AlphaTrend line (seeded with close during warmup).
    pub line: f64,
    /// Main line delayed by two candles, once available.
    pub signal: Option<f64>,
    /// Bullish while `line > signal`; undefined until the delay fills.
    pub direction: Option<Direction>,
}

// =============================================================================
// AlphaTrend
// =============================================================================

#[derive(Debug, Clone)]
pub struct AlphaTrend {
    coeff: f64,
    atr: AtrState,
    mfi: MfiState,
    prev_line: Option<f64>,
    /// Previous line values, most recent last; front is the oldest needed
    /// for the delayed signal.
    history: VecDeque<f64>,
}

impl AlphaTrend {
    pub fn new(params: &AlphaTrendParams) -> Self {
        Self {
            coeff: params.coeff,
            atr: AtrState::new(params.period),
            mfi: MfiState::new(params.period),
            prev_line: None,
            history: VecDeque::with_capacity(SIGNAL_DELAY + 1),
        }
    }

    pub fn update(&mut self, candle: &Candle) -> AlphaTrendOutput {
        let (_, atr) = self.atr.update(candle);
        // Gate defaults to neutral while its own window fills.
        let gate = self.mfi.update(candle).unwrap_or(50.0);

        let line = match (atr, self.prev_line) {
            (Some(atr), Some(prev)) => {
                if gate >= 50.0 {
                    (candle.low - self.coeff * atr).max(prev)
                } else {
                    (candle.high + self.coeff * atr).min(prev)
                }
            }
            // Warmup: follow the close until the ATR window fills.
            _ => candle.close,
        };

        // Signal = line two candles ago (history holds previous lines only).
        let signal = if self.history.len() >= SIGNAL_DELAY {
            self.history
                .get(self.history.len() - SIGNAL_DELAY)
                .copied()
        } else {
            None
        };

        let direction = match (atr, signal) {
            (Some(_), Some(sig)) => Some(if line > sig {
                Direction::Bullish
            } else {
                Direction::Bearish
            }),
            _ => None,
        };

        self.prev_line = Some(line);
        self.history.push_back(line);
        if self.history.len() > SIGNAL_DELAY + 1 {
            self.history.pop_front();
        }

        AlphaTrendOutput {
            line,
            signal,
            direction,
        }
    }
}

// =============================================================================
// MfiState — incremental Money Flow Index
// =============================================================================

#[derive(Debug, Clone)]
struct MfiState {
    prev_typical: Option<f64>,
    positive: RollingWindow,
    negative: RollingWindow,
}

impl MfiState {
    fn new(period: usize) -> Self {
        Self {
            prev_typical: None,
            positive: RollingWindow::new(period.max(1)),
            negative: RollingWindow::new(period.max(1)),
        }
    }

    fn update(&mut self, candle: &Candle) -> Option<f64> {
        let typical = candle.hlc3();
        let flow = typical * candle.volume;

        let prev = self.prev_typical.replace(typical);
        let (pos, neg) = match prev {
            Some(p) if typical > p => (flow, 0.0),
            Some(p) if typical < p => (0.0, flow),
            // Flat typical price (or first candle) contributes to neither side.
            _ => (0.0, 0.0),
        };
        self.positive.push(pos);
        self.negative.push(neg);

        if !self.positive.is_full() {
            return None;
        }

        let pos_sum = self.positive.sum();
        let neg_sum = self.negative.sum();
        Some(if neg_sum == 0.0 {
            if pos_sum == 0.0 {
                50.0 // Flat tape: neutral, never NaN.
            } else {
                100.0
            }
        } else {
            100.0 - 100.0 / (1.0 + pos_sum / neg_sum)
        })
    }
}
