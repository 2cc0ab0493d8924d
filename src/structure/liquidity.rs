// =============================================================================
// Liquidity Grabs — stop hunts beyond rolling swing extremes
// =============================================================================
//
// Using the rolling low/high of the previous `window` candles (the current
// candle excluded):
//
//   bullish grab: low wicks below the rolling swing low, the close reclaims
//                 it, and the candle itself is bullish
//   bearish grab: high wicks above the rolling swing high, the close drops
//                 back below it, and the candle is bearish
//
// Undefined until `window` prior candles exist.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market_data::Candle;
use crate::window::RollingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LiquidityEvent {
    pub bullish: bool,
    pub bearish: bool,
}

// =============================================================================
// LiquidityDetector
// =============================================================================

#[derive(Debug, Clone)]
pub struct LiquidityDetector {
    highs: RollingWindow,
    lows: RollingWindow,
}

impl LiquidityDetector {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            highs: RollingWindow::new(window),
            lows: RollingWindow::new(window),
        }
    }

    /// Feed one candle; `None` until the prior-candle window is full.
    pub fn update(&mut self, candle: &Candle) -> Option<LiquidityEvent> {
        let event = if self.highs.is_full() {
            let swing_high = self.highs.max()?;
            let swing_low = self.lows.min()?;

            let bullish =
                candle.low < swing_low && candle.close > swing_low && candle.is_bullish();
            let bearish =
                candle.high > swing_high && candle.close < swing_high && candle.is_bearish();

            if bullish {
                debug!(swing_low, low = candle.low, close = candle.close, "bullish liquidity grab");
            }
            if bearish {
                debug!(swing_high, high = candle.high, close = candle.close, "bearish liquidity grab");
            }

            Some(LiquidityEvent { bullish, bearish })
        } else {
            None
        };

        // Current candle joins the window only after its own evaluation.
        self.highs.push(candle.high);
        self.lows.push(candle.low);
        event
    }
}
