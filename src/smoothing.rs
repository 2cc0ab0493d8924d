// =============================================================================
// Incremental Smoothers — EMA, SMA and Wilder RSI as step state machines
// =============================================================================
//
// Every smoother here is written as an explicit `update(value) -> Option`
// state machine so that a fold over a full history produces bit-identical
// output to repeated single-value updates.
//
// EMA:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
// The first EMA value is seeded with the SMA of the first `period` inputs;
// until then the smoother reports `None`.
//
// Wilder RSI:
//   avg_gain = (prev_avg_gain * (period - 1) + gain) / period   (and losses)
// seeded with the SMA of the first `period` deltas.
// =============================================================================

use crate::window::RollingWindow;

// =============================================================================
// EmaState
// =============================================================================

#[derive(Debug, Clone)]
pub struct EmaState {
    period: usize,
    multiplier: f64,
    seed: Vec<f64>,
    value: Option<f64>,
}

impl EmaState {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            seed: Vec::with_capacity(period),
            value: None,
        }
    }

    /// Feed one value; returns the EMA once the SMA seed is complete.
    pub fn update(&mut self, value: f64) -> Option<f64> {
        match self.value {
            Some(prev) => {
                let next = value * self.multiplier + prev * (1.0 - self.multiplier);
                self.value = Some(next);
                self.value
            }
            None => {
                self.seed.push(value);
                if self.seed.len() == self.period {
                    let sma = self.seed.iter().sum::<f64>() / self.period as f64;
                    self.value = Some(sma);
                    self.seed.clear();
                    self.seed.shrink_to_fit();
                }
                self.value
            }
        }
    }
}

// =============================================================================
// SmaState
// =============================================================================

#[derive(Debug, Clone)]
pub struct SmaState {
    window: RollingWindow,
}

impl SmaState {
    pub fn new(period: usize) -> Self {
        Self {
            window: RollingWindow::new(period.max(1)),
        }
    }

    /// Feed one value; returns the SMA once the window is full.
    pub fn update(&mut self, value: f64) -> Option<f64> {
        self.window.push(value);
        if self.window.is_full() {
            Some(self.window.mean())
        } else {
            None
        }
    }
}

// =============================================================================
// WilderRsiState
// =============================================================================

#[derive(Debug, Clone)]
pub struct WilderRsiState {
    period: usize,
    prev_close: Option<f64>,
    seed_gains: Vec<f64>,
    seed_losses: Vec<f64>,
    avg_gain: Option<f64>,
    avg_loss: Option<f64>,
}

impl WilderRsiState {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            prev_close: None,
            seed_gains: Vec::with_capacity(period),
            seed_losses: Vec::with_capacity(period),
            avg_gain: None,
            avg_loss: None,
        }
    }

    /// Feed one close; returns the RSI once `period` deltas have been seen.
    pub fn update(&mut self, close: f64) -> Option<f64> {
        let prev = match self.prev_close.replace(close) {
            Some(p) => p,
            None => return None, // First close — no delta yet.
        };

        let delta = close - prev;
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        match (self.avg_gain, self.avg_loss) {
            (Some(ag), Some(al)) => {
                let p = self.period as f64;
                self.avg_gain = Some((ag * (p - 1.0) + gain) / p);
                self.avg_loss = Some((al * (p - 1.0) + loss) / p);
            }
            _ => {
                self.seed_gains.push(gain);
                self.seed_losses.push(loss);
                if self.seed_gains.len() == self.period {
                    let p = self.period as f64;
                    self.avg_gain = Some(self.seed_gains.iter().sum::<f64>() / p);
                    self.avg_loss = Some(self.seed_losses.iter().sum::<f64>() / p);
                    self.seed_gains.clear();
                    self.seed_losses.clear();
                } else {
                    return None;
                }
            }
        }

        let (ag, al) = (self.avg_gain?, self.avg_loss?);
        Some(rsi_from_averages(ag, al))
    }
}

/// Convert average gain / loss into an RSI value in [0, 100].
///
/// Both averages zero => 50 (no movement).  Zero loss => 100 (all gains).
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}
