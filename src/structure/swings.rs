// =============================================================================
// Swing Points — centered-window extremes, confirmed w candles late
// =============================================================================
//
// A candle at index i is a confirmed swing high (low) once w later candles
// have been observed and its high (low) is the maximum (minimum) of the
// 2w+1 candle window centered on i.  Confirmation is therefore always
// exactly w candles late — an irreducible property of centered detection,
// not a defect.  Only confirmed swings are ever emitted.
// =============================================================================

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::market_data::Candle;
use crate::types::SwingKind;

/// A confirmed local extreme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    /// Index of the extreme candle itself (not the confirming candle).
    pub index: usize,
    pub price: f64,
    pub kind: SwingKind,
    /// Always true on emitted points; candidates are internal only.
    pub confirmed: bool,
}

// =============================================================================
// SwingTracker
// =============================================================================

#[derive(Debug, Clone)]
pub struct SwingTracker {
    window: usize,
    /// Last 2w+1 candles as (index, high, low), oldest first.
    buffer: VecDeque<(usize, f64, f64)>,
}

impl SwingTracker {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            buffer: VecDeque::with_capacity(2 * window + 2),
        }
    }

    /// Feed candle `index`; returns the swings confirmed by this candle
    /// (zero, one, or — on a candle that is both extreme kinds' pivot — two).
    pub fn update(&mut self, index: usize, candle: &Candle) -> Vec<SwingPoint> {
        self.buffer.push_back((index, candle.high, candle.low));
        let span = 2 * self.window + 1;
        if self.buffer.len() > span {
            self.buffer.pop_front();
        }
        if self.buffer.len() < span {
            return Vec::new();
        }

        // Candidate sits in the middle of the full window: index - w.
        let (cand_index, cand_high, cand_low) = self.buffer[self.window];
        let mut confirmed = Vec::new();

        if self
            .buffer
            .iter()
            .all(|&(i, high, _)| i == cand_index || high <= cand_high)
        {
            confirmed.push(SwingPoint {
                index: cand_index,
                price: cand_high,
                kind: SwingKind::High,
                confirmed: true,
            });
        }
        if self
            .buffer
            .iter()
            .all(|&(i, _, low)| i == cand_index || low >= cand_low)
        {
            confirmed.push(SwingPoint {
                index: cand_index,
                price: cand_low,
                kind: SwingKind::Low,
                confirmed: true,
            });
        }

        confirmed
    }
}
