// =============================================================================
// True Range & Average True Range (ATR)
// =============================================================================
//
// True Range captures the full trading range of a candle including any gap
// from the previous close:
//
//   TR = max(high - low, |high - prev_close|, |low - prev_close|)
//
// On the very first candle there is no previous close, so TR = high - low.
//
// ATR is the simple moving average of TR over `period` candles.  It is
// undefined (None) until `period` TR values exist — callers must treat
// "undefined" as a distinct state, never zero.
// =============================================================================

use crate::market_data::Candle;
use crate::window::RollingWindow;

/// True Range for one candle given the previous close (if any).
pub fn true_range(candle: &Candle, prev_close: Option<f64>) -> f64 {
    let hl = candle.high - candle.low;
    match prev_close {
        Some(pc) => {
            let hc = (candle.high - pc).abs();
            let lc = (candle.low - pc).abs();
            hl.max(hc).max(lc)
        }
        None => hl,
    }
}

// =============================================================================
// AtrState
// =============================================================================

/// Incremental ATR: rolling SMA of True Range over `period`.
#[derive(Debug, Clone)]
pub struct AtrState {
    window: RollingWindow,
    prev_close: Option<f64>,
}

impl AtrState {
    pub fn new(period: usize) -> Self {
        Self {
            window: RollingWindow::new(period.max(1)),
            prev_close: None,
        }
    }

    /// Feed one candle; returns `(true_range, atr)`.
    ///
    /// `atr` is `None` until the window holds `period` TR values.
    pub fn update(&mut self, candle: &Candle) -> (f64, Option<f64>) {
        let tr = true_range(candle, self.prev_close);
        self.prev_close = Some(candle.close);
        self.window.push(tr);

        let atr = if self.window.is_full() {
            Some(self.window.mean())
        } else {
            None
        };
        (tr, atr)
    }
}
