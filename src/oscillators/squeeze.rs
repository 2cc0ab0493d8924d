// =============================================================================
// Squeeze Momentum — Bollinger-inside-Keltner volatility compression
// =============================================================================
//
// Squeeze is "on" when the Bollinger band sits entirely inside the Keltner
// channel (statistical dispersion compressed below the ATR envelope):
//
//   bb = SMA(close, bb_length) ± bb_mult * stdev(close, bb_length)
//   kc = SMA(close, kc_length) ± kc_mult * ATR(kc_length)
//   on    = bb_upper < kc_upper && bb_lower > kc_lower
//   fired = was on last candle && not on now
//
// The companion momentum value indicates the likely breakout direction:
//
//   mom = SMA(close - ((highest(high,kc) + lowest(low,kc)) / 2
//                      + SMA(close,kc)) / 2, momentum_length)
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SqueezeParams;
use crate::market_data::Candle;
use crate::smoothing::SmaState;
use crate::volatility::AtrState;
use crate::window::RollingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqueezeOutput {
    pub on: bool,
    /// True only on the candle where the squeeze releases (on -> off).
    pub fired: bool,
    /// Directional momentum; lags by its own SMA warmup.
    pub momentum: Option<f64>,
}

// =============================================================================
// SqueezeMomentum
// =============================================================================

#[derive(Debug, Clone)]
pub struct SqueezeMomentum {
    bb_mult: f64,
    kc_mult: f64,
    closes: RollingWindow,
    kc_closes: RollingWindow,
    highs: RollingWindow,
    lows: RollingWindow,
    atr: AtrState,
    momentum: SmaState,
    prev_on: Option<bool>,
}

impl SqueezeMomentum {
    pub fn new(params: &SqueezeParams) -> Self {
        Self {
            bb_mult: params.bb_mult,
            kc_mult: params.kc_mult,
            closes: RollingWindow::new(params.bb_length.max(1)),
            kc_closes: RollingWindow::new(params.kc_length.max(1)),
            highs: RollingWindow::new(params.kc_length.max(1)),
            lows: RollingWindow::new(params.kc_length.max(1)),
            atr: AtrState::new(params.kc_length),
            momentum: SmaState::new(params.momentum_length),
            prev_on: None,
        }
    }

    /// Feed one candle; `None` until both band windows are full.
    pub fn update(&mut self, candle: &Candle) -> Option<SqueezeOutput> {
        self.closes.push(candle.close);
        self.kc_closes.push(candle.close);
        self.highs.push(candle.high);
        self.lows.push(candle.low);
        let (_, atr) = self.atr.update(candle);

        if !self.closes.is_full() || !self.kc_closes.is_full() {
            return None;
        }
        let atr = atr?;

        let bb_basis = self.closes.mean();
        let bb_dev = self.bb_mult * self.closes.std_dev();
        let kc_basis = self.kc_closes.mean();
        let kc_range = self.kc_mult * atr;

        let on = bb_basis + bb_dev < kc_basis + kc_range && bb_basis - bb_dev > kc_basis - kc_range;
        let fired = self.prev_on == Some(true) && !on;
        self.prev_on = Some(on);

        if fired {
            debug!("squeeze released");
        }

        let channel_mid = (self.highs.max()? + self.lows.min()?) / 2.0;
        let momentum = self
            .momentum
            .update(candle.close - (channel_mid + kc_basis) / 2.0);

        Some(SqueezeOutput { on, fired, momentum })
    }
}
