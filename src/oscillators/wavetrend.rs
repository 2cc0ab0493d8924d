// =============================================================================
// WaveTrend — double-smoothed momentum oscillator (LazyBear variant)
// =============================================================================
//
//   esa = EMA(hlc3, channel_length)
//   d   = EMA(|hlc3 - esa|, channel_length)
//   ci  = (hlc3 - esa) / (0.015 * d)          (d == 0 => ci = 0)
//   wt1 = EMA(ci, average_length)
//   wt2 = SMA(wt1, signal_length)
//
// Crossovers of wt1 against wt2 near the ±overbought/oversold thresholds
// mark reversal candidates.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::config::WaveTrendParams;
use crate::market_data::Candle;
use crate::smoothing::{EmaState, SmaState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveTrendOutput {
    pub wt1: f64,
    /// Signal line; lags wt1 by its own SMA warmup.
    pub wt2: Option<f64>,
    pub overbought: bool,
    pub oversold: bool,
    /// wt1 crossed above wt2 on this candle.
    pub cross_up: bool,
    /// wt1 crossed below wt2 on this candle.
    pub cross_down: bool,
}

// =============================================================================
// WaveTrend
// =============================================================================

#[derive(Debug, Clone)]
pub struct WaveTrend {
    overbought: f64,
    oversold: f64,
    esa: EmaState,
    dev: EmaState,
    wt1: EmaState,
    wt2: SmaState,
    prev: Option<(f64, f64)>, // (wt1, wt2) of the previous candle
}

impl WaveTrend {
    pub fn new(params: &WaveTrendParams) -> Self {
        Self {
            overbought: params.overbought,
            oversold: params.oversold,
            esa: EmaState::new(params.channel_length),
            dev: EmaState::new(params.channel_length),
            wt1: EmaState::new(params.average_length),
            wt2: SmaState::new(params.signal_length),
            prev: None,
        }
    }

    /// Feed one candle; `None` until the smoothing chain warms up.
    pub fn update(&mut self, candle: &Candle) -> Option<WaveTrendOutput> {
        let hlc3 = candle.hlc3();
        let esa = self.esa.update(hlc3)?;
        let d = self.dev.update((hlc3 - esa).abs())?;

        // Flat tape collapses the deviation: neutral oscillator, never NaN.
        let ci = if d == 0.0 { 0.0 } else { (hlc3 - esa) / (0.015 * d) };

        let wt1 = self.wt1.update(ci)?;
        let wt2 = self.wt2.update(wt1);

        let (cross_up, cross_down) = match (wt2, self.prev) {
            (Some(w2), Some((p1, p2))) => (p1 <= p2 && wt1 > w2, p1 >= p2 && wt1 < w2),
            _ => (false, false),
        };
        if let Some(w2) = wt2 {
            self.prev = Some((wt1, w2));
        }

        Some(WaveTrendOutput {
            wt1,
            wt2,
            overbought: wt1 > self.overbought,
            oversold: wt1 < self.oversold,
            cross_up,
            cross_down,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn candle(high: f64, low: f64, close: f64) -> Candle {
        Candle {
            open_time: 0,
            open: (high + low) / 2.0,
            high,
            low,
            close,
            volume: 1.0,
            close_time: 0,
        }
    }

    fn make() -> WaveTrend {
        WaveTrend::new(&WaveTrendParams {
            channel_length: 3,
            average_length: 4,
            signal_length: 2,
            overbought: 60.0,
            oversold: -60.0,
        })
    }

    #[test]
    fn none_during_warmup() {
        let mut wt = make();
        assert!(wt.update(&candle(101.0, 99.0, 100.0)).is_none());
        assert!(wt.update(&candle(102.0, 100.0, 101.0)).is_none());
    }

    #[test]
    fn flat_series_stays_neutral() {
        let mut wt = make();
        let mut last = None;
        for _ in 0..30 {
            if let Some(out) = wt.update(&candle(100.0, 100.0, 100.0)) {
                last = Some(out);
            }
        }
        let out = last.unwrap();
        assert!(out.wt1.abs() < 1e-9);
        assert!(!out.overbought);
        assert!(!out.oversold);
    }

    #[test]
    fn sustained_rally_goes_overbought() {
        let mut wt = make();
        let mut last = None;
        for i in 0..40 {
            let base = 100.0 + (i as f64).powi(2) * 0.1; // accelerating rally
            if let Some(out) = wt.update(&candle(base + 1.0, base - 1.0, base + 0.8)) {
                last = Some(out);
            }
        }
        let out = last.unwrap();
        assert!(out.overbought, "wt1 = {}", out.wt1);
        assert!(!out.oversold);
    }

    #[test]
    fn breakdown_from_flat_produces_cross_down() {
        let mut wt = make();
        // Flat tape parks wt1 and wt2 together at zero with no crosses.
        for _ in 0..30 {
            if let Some(out) = wt.update(&candle(100.0, 100.0, 100.0)) {
                assert!(!out.cross_up);
                assert!(!out.cross_down);
            }
        }
        // The breakdown drags wt1 below the slower wt2.
        let mut saw_cross_down = false;
        for i in 0..10 {
            let base = 100.0 - 5.0 * (i + 1) as f64;
            if let Some(out) = wt.update(&candle(base + 1.0, base - 1.0, base - 0.8)) {
                if out.cross_down {
                    saw_cross_down = true;
                }
                assert!(!(out.cross_up && out.cross_down));
            }
        }
        assert!(saw_cross_down);
    }
}
