// =============================================================================
// HalfTrend — amplitude-window midline with an ATR channel and band-flip logic
// =============================================================================
//
// Raw bands each candle:
//   midline    = (highest(high, amplitude) + lowest(low, amplitude)) / 2
//   raw_upper  = midline + channel_deviation * ATR
//   raw_lower  = midline - channel_deviation * ATR
//
// The midline reacts to the recent extreme range rather than the single
// candle, which makes HalfTrend slower to whipsaw than SuperTrend.  Both
// share the same flip/ratchet core.
// =============================================================================

use tracing::debug;

use crate::config::HalfTrendParams;
use crate::market_data::Candle;
use crate::trend::band_flip::BandFlipCore;
use crate::trend::TrendOutput;
use crate::volatility::AtrState;
use crate::window::RollingWindow;

#[derive(Debug, Clone)]
pub struct HalfTrend {
    channel_deviation: f64,
    highs: RollingWindow,
    lows: RollingWindow,
    atr: AtrState,
    core: BandFlipCore,
}

impl HalfTrend {
    /// `atr_period` is the engine-wide ATR period; the amplitude window only
    /// shapes the midline.
    pub fn new(params: &HalfTrendParams, atr_period: usize) -> Self {
        let amplitude = params.amplitude.max(1);
        Self {
            channel_deviation: params.channel_deviation,
            highs: RollingWindow::new(amplitude),
            lows: RollingWindow::new(amplitude),
            atr: AtrState::new(atr_period),
            core: BandFlipCore::new(),
        }
    }

    /// Feed one candle; `None` until both the amplitude window and the ATR
    /// window are full.
    pub fn update(&mut self, candle: &Candle) -> Option<TrendOutput> {
        self.highs.push(candle.high);
        self.lows.push(candle.low);
        let (_, atr) = self.atr.update(candle);

        if !self.highs.is_full() {
            return None;
        }
        let atr = atr?;

        let midline = (self.highs.max()? + self.lows.min()?) / 2.0;
        let raw_upper = midline + self.channel_deviation * atr;
        let raw_lower = midline - self.channel_deviation * atr;

        let step = self.core.step(candle.close, raw_upper, raw_lower);
        if step.flipped {
            debug!(direction = %step.direction, line = step.line, "halftrend flip");
        }

        Some(TrendOutput {
            direction: step.direction,
            line: step.line,
            flipped: step.flipped,
        })
    }
}
