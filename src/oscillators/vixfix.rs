// =============================================================================
// Williams VixFix — synthetic volatility/capitulation gauge
// =============================================================================
//
//   wvf = (highest(close, lookback) - low) / highest(close, lookback) * 100
//
// Spikes in wvf mark capitulation (price far below the recent best close).
// Panic is declared when wvf exceeds its own Bollinger upper band; a
// reversal fires on the candle where panic subsides while price is already
// rising — the classic bottom-fishing signal.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::config::VixFixParams;
use crate::market_data::Candle;
use crate::window::RollingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VixFixOutput {
    pub value: f64,
    /// wvf above its Bollinger upper band; `None` until the band warms up.
    pub panic: Option<bool>,
    /// Panic subsided this candle while the close is rising.
    pub reversal: bool,
}

// =============================================================================
// VixFix
// =============================================================================

#[derive(Debug, Clone)]
pub struct VixFix {
    bb_mult: f64,
    closes: RollingWindow,
    wvf_window: RollingWindow,
    prev_close: Option<f64>,
    prev_panic: Option<bool>,
}

impl VixFix {
    pub fn new(params: &VixFixParams) -> Self {
        Self {
            bb_mult: params.bb_mult,
            closes: RollingWindow::new(params.lookback.max(1)),
            wvf_window: RollingWindow::new(params.bb_length.max(1)),
            prev_close: None,
            prev_panic: None,
        }
    }

    /// Feed one candle; `None` until the close lookback is full.
    pub fn update(&mut self, candle: &Candle) -> Option<VixFixOutput> {
        self.closes.push(candle.close);
        let prev_close = self.prev_close.replace(candle.close);

        if !self.closes.is_full() {
            return None;
        }

        let highest_close = self.closes.max()?;
        // Prices are validated non-negative; an all-zero tape reads zero.
        let value = if highest_close == 0.0 {
            0.0
        } else {
            (highest_close - candle.low) / highest_close * 100.0
        };

        self.wvf_window.push(value);
        let panic = if self.wvf_window.is_full() {
            let upper = self.wvf_window.mean() + self.bb_mult * self.wvf_window.std_dev();
            Some(value > upper)
        } else {
            None
        };

        let rising = matches!(prev_close, Some(pc) if candle.close > pc);
        let reversal = self.prev_panic == Some(true) && panic == Some(false) && rising;
        if panic.is_some() {
            self.prev_panic = panic;
        }

        Some(VixFixOutput {
            value,
            panic,
            reversal,
        })
    }
}
