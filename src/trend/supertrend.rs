// =============================================================================
// SuperTrend — ATR channel around the candle midpoint with band-flip logic
// =============================================================================
//
// Raw bands each candle:
//   basis      = (high + low) / 2
//   raw_upper  = basis + multiplier * ATR(period)
//   raw_lower  = basis - multiplier * ATR(period)
//
// fed through the shared band-flip core.  Output is undefined until the ATR
// window fills.
// =============================================================================

use tracing::debug;

use crate::config::SuperTrendParams;
use crate::market_data::Candle;
use crate::trend::band_flip::BandFlipCore;
use crate::trend::TrendOutput;
use crate::volatility::AtrState;

#[derive(Debug, Clone)]
pub struct SuperTrend {
    multiplier: f64,
    atr: AtrState,
    core: BandFlipCore,
}

impl SuperTrend {
    pub fn new(params: &SuperTrendParams) -> Self {
        Self {
            multiplier: params.multiplier,
            atr: AtrState::new(params.period),
            core: BandFlipCore::new(),
        }
    }

    /// Feed one candle; `None` until the ATR window is full.
    pub fn update(&mut self, candle: &Candle) -> Option<TrendOutput> {
        let (_, atr) = self.atr.update(candle);
        let atr = atr?;

        let basis = candle.hl2();
        let raw_upper = basis + self.multiplier * atr;
        let raw_lower = basis - self.multiplier * atr;

        let step = self.core.step(candle.close, raw_upper, raw_lower);
        if step.flipped {
            debug!(direction = %step.direction, line = step.line, "supertrend flip");
        }

        Some(TrendOutput {
            direction: step.direction,
            line: step.line,
            flipped: step.flipped,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
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

    fn default_params() -> SuperTrendParams {
        SuperTrendParams {
            period: 3,
            multiplier: 2.0,
        }
    }

    #[test]
    fn undefined_until_atr_window_full() {
        let mut st = SuperTrend::new(&default_params());
        assert!(st.update(&candle(100.0, 101.0, 99.0, 100.5)).is_none());
        assert!(st.update(&candle(100.5, 101.5, 99.5, 101.0)).is_none());
        assert!(st.update(&candle(101.0, 102.0, 100.0, 101.5)).is_some());
    }

    #[test]
    fn uptrend_stays_bullish_with_rising_line() {
        let mut st = SuperTrend::new(&default_params());
        let mut prev_line: Option<f64> = None;
        for i in 0..20 {
            let base = 100.0 + i as f64;
            let out = st.update(&candle(base, base + 1.0, base - 1.0, base + 0.5));
            if let Some(out) = out {
                assert_eq!(out.direction, Direction::Bullish);
                if let Some(p) = prev_line {
                    assert!(out.line >= p - 1e-12, "band moved backward while bullish");
                }
                prev_line = Some(out.line);
            }
        }
    }

    #[test]
    fn crash_flips_bearish() {
        let mut st = SuperTrend::new(&default_params());
        for i in 0..10 {
            let base = 100.0 + i as f64;
            st.update(&candle(base, base + 1.0, base - 1.0, base + 0.5));
        }
        // Collapse far through the ratcheted lower band.
        let out = st
            .update(&candle(108.0, 108.0, 60.0, 61.0))
            .expect("atr warm");
        assert_eq!(out.direction, Direction::Bearish);
        assert!(out.flipped);
    }
}
