// =============================================================================
// Volatility Regime — ATR z-score classification
// =============================================================================
//
// Classifies current volatility relative to its own recent history:
//
//   z = (atr - mean(atr, lookback)) / std(atr, lookback)
//
//   z >  high_z  (1.5)  => HIGH_VOL  (multiplier 1.5)
//   z <  low_z  (-0.5)  => LOW_VOL   (multiplier 0.8)
//   otherwise           => NORMAL    (multiplier 1.0)
//
// A zero standard deviation (constant ATR over the lookback) yields z = 0
// and therefore NORMAL — never an error.  The classification is undefined
// until the lookback window is full.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RegimeParams;
use crate::types::VolRegime;
use crate::window::RollingWindow;

/// One classification step's output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeReading {
    pub regime: VolRegime,
    pub z_score: f64,
    pub size_multiplier: f64,
}

// =============================================================================
// RegimeState
// =============================================================================

#[derive(Debug, Clone)]
pub struct RegimeState {
    params: RegimeParams,
    window: RollingWindow,
    last: Option<VolRegime>,
}

impl RegimeState {
    pub fn new(params: RegimeParams) -> Self {
        let capacity = params.lookback.max(1);
        Self {
            params,
            window: RollingWindow::new(capacity),
            last: None,
        }
    }

    /// Feed the latest ATR value; returns `None` until the lookback fills.
    pub fn update(&mut self, atr: f64) -> Option<RegimeReading> {
        self.window.push(atr);
        if !self.window.is_full() {
            return None;
        }

        let mean = self.window.mean();
        let std = self.window.std_dev();
        // Zero dispersion means "nothing unusual": neutral z, NORMAL regime.
        let z = if std == 0.0 { 0.0 } else { (atr - mean) / std };

        let regime = if z > self.params.high_z {
            VolRegime::HighVol
        } else if z < self.params.low_z {
            VolRegime::LowVol
        } else {
            VolRegime::Normal
        };

        if self.last != Some(regime) {
            debug!(%regime, z_score = z, "volatility regime transition");
            self.last = Some(regime);
        }

        let size_multiplier = match regime {
            VolRegime::HighVol => self.params.high_mult,
            VolRegime::Normal => self.params.normal_mult,
            VolRegime::LowVol => self.params.low_mult,
        };

        Some(RegimeReading {
            regime,
            z_score: z,
            size_multiplier,
        })
    }
}
