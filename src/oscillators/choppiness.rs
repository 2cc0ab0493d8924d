// =============================================================================
// Choppiness Index — trendiness vs sideways chop
// =============================================================================
//
//   CHOP = 100 * log10( sum(TR, p) / (highest(high, p) - lowest(low, p)) )
//               / log10(p)
//
// Values near 100 mean sideways chop (the path length dwarfs the net range);
// values near 0 mean a clean directional move.  A zero high-low range (flat
// series) is a degenerate division and falls back to the neutral 50.
// =============================================================================

use crate::market_data::Candle;
use crate::volatility::true_range;
use crate::window::RollingWindow;

/// Neutral reading substituted when the range collapses to zero.
const NEUTRAL_CHOP: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Choppiness {
    period: usize,
    tr_window: RollingWindow,
    highs: RollingWindow,
    lows: RollingWindow,
    prev_close: Option<f64>,
}

impl Choppiness {
    pub fn new(period: usize) -> Self {
        let period = period.max(2);
        Self {
            period,
            tr_window: RollingWindow::new(period),
            highs: RollingWindow::new(period),
            lows: RollingWindow::new(period),
            prev_close: None,
        }
    }

    /// Feed one candle; `None` until `period` candles have been seen.
    pub fn update(&mut self, candle: &Candle) -> Option<f64> {
        let tr = true_range(candle, self.prev_close);
        self.prev_close = Some(candle.close);

        self.tr_window.push(tr);
        self.highs.push(candle.high);
        self.lows.push(candle.low);

        if !self.tr_window.is_full() {
            return None;
        }

        let range = self.highs.max()? - self.lows.min()?;
        if range == 0.0 {
            return Some(NEUTRAL_CHOP);
        }

        Some(100.0 * (self.tr_window.sum() / range).log10() / (self.period as f64).log10())
    }
}
