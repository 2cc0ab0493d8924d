// =============================================================================
// Structure Detector — per-candle orchestration of the structural components
// =============================================================================
//
// Per candle, in order:
//   1. swing confirmation (w candles late) feeds the break detector's levels
//   2. break evaluation (BOS/CHoCH) against those levels
//   3. liquidity-grab evaluation against the rolling extremes
//   4. mitigation and eviction of existing zones
//   5. creation of new order-block / FVG zones (a zone created on this
//      candle cannot be mitigated by the same close)
//   6. touch flags against the remaining active zones
// =============================================================================

use crate::config::StructureParams;
use crate::market_data::Candle;
use crate::structure::breaks::{BreakDetector, BreakEvent};
use crate::structure::fvg::FvgDetector;
use crate::structure::liquidity::{LiquidityDetector, LiquidityEvent};
use crate::structure::order_blocks::OrderBlockDetector;
use crate::structure::swings::{SwingPoint, SwingTracker};
use crate::structure::zones::{Zone, ZoneArena};
use crate::types::{Polarity, ZoneKind};

/// Structural signals for one candle.
#[derive(Debug, Clone, Default)]
pub struct StructureOutput {
    /// Swings confirmed on this candle (their `index` lies `w` in the past).
    pub swings: Vec<SwingPoint>,
    pub bos: Option<Polarity>,
    pub choch: Option<Polarity>,
    /// `None` until the liquidity window fills.
    pub liquidity: Option<LiquidityEvent>,
    pub ob_touch_bullish: bool,
    pub ob_touch_bearish: bool,
    pub fvg_touch_bullish: bool,
    pub fvg_touch_bearish: bool,
}

// =============================================================================
// StructureDetector
// =============================================================================

#[derive(Debug, Clone)]
pub struct StructureDetector {
    swings: SwingTracker,
    breaks: BreakDetector,
    order_blocks: OrderBlockDetector,
    fvg: FvgDetector,
    liquidity: LiquidityDetector,
    arena: ZoneArena,
    next_index: usize,
}

impl StructureDetector {
    pub fn new(params: &StructureParams) -> Self {
        Self {
            swings: SwingTracker::new(params.swing_window),
            breaks: BreakDetector::new(),
            order_blocks: OrderBlockDetector::new(params),
            fvg: FvgDetector::new(),
            liquidity: LiquidityDetector::new(params.swing_window),
            arena: ZoneArena::new(params.zone_retention),
            next_index: 0,
        }
    }

    pub fn update(&mut self, candle: &Candle) -> StructureOutput {
        let index = self.next_index;
        self.next_index += 1;

        let swings = self.swings.update(index, candle);
        for swing in &swings {
            self.breaks.on_swing(swing);
        }

        let BreakEvent { bos, choch } = self.breaks.on_close(candle.close);
        let liquidity = self.liquidity.update(candle);

        self.arena.mitigate(index, candle.close);
        self.arena.evict(index);

        if let Some(zone) = self.order_blocks.update(index, candle) {
            self.arena.try_create(zone);
        }
        if let Some(zone) = self.fvg.update(index, candle) {
            self.arena.try_create(zone);
        }

        StructureOutput {
            swings,
            bos,
            choch,
            liquidity,
            ob_touch_bullish: self.arena.touched(
                ZoneKind::OrderBlock,
                Polarity::Bullish,
                candle.high,
                candle.low,
            ),
            ob_touch_bearish: self.arena.touched(
                ZoneKind::OrderBlock,
                Polarity::Bearish,
                candle.high,
                candle.low,
            ),
            fvg_touch_bullish: self.arena.touched(
                ZoneKind::FairValueGap,
                Polarity::Bullish,
                candle.high,
                candle.low,
            ),
            fvg_touch_bearish: self.arena.touched(
                ZoneKind::FairValueGap,
                Polarity::Bearish,
                candle.high,
                candle.low,
            ),
        }
    }

    /// Zones currently active (for the output record's zone bounds).
    pub fn active_zones(&self) -> impl Iterator<Item = &Zone> {
        self.arena.active()
    }

    /// Full zone history, including mitigated and evicted records.
    pub fn zones(&self) -> &[Zone] {
        self.arena.all()
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, close: f64, high: f64, low: f64) -> Candle {
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

    fn quiet(base: f64) -> Candle {
        candle(base, base + 0.1, base + 0.5, base - 0.5)
    }

    fn params() -> StructureParams {
        StructureParams {
            swing_window: 3,
            ..StructureParams::default()
        }
    }

    #[test]
    fn impulse_creates_one_bullish_order_block_that_survives_until_mitigation() {
        let mut det = StructureDetector::new(&params());
        for i in 0..5 {
            det.update(&quiet(100.0 + 0.01 * i as f64));
        }
        // Bearish anchor, then three bullish candles.
        det.update(&candle(102.0, 100.0, 102.5, 99.5)); // index 5: anchor
        det.update(&candle(100.0, 101.0, 101.5, 99.8));
        det.update(&candle(101.0, 102.0, 102.5, 100.8));
        det.update(&candle(102.0, 103.0, 103.5, 101.8));
        // Run continues: the same anchor must not spawn a second zone.
        det.update(&candle(103.0, 104.0, 104.5, 102.8));

        let obs: Vec<_> = det
            .zones()
            .iter()
            .filter(|z| z.kind == ZoneKind::OrderBlock)
            .collect();
        assert_eq!(obs.len(), 1);
        let ob = obs[0];
        assert_eq!(ob.polarity, Polarity::Bullish);
        assert_eq!(ob.created_at, 5);
        assert!(ob.active);

        // A close below the zone bottom (99.5) mitigates it.
        det.update(&candle(100.0, 99.0, 100.2, 98.8));
        let ob = det
            .zones()
            .iter()
            .find(|z| z.kind == ZoneKind::OrderBlock)
            .unwrap();
        assert!(!ob.active);
        assert!(ob.mitigated_at.is_some());
    }

    #[test]
    fn liquidity_grab_does_not_coincide_with_bearish_bos() {
        let mut det = StructureDetector::new(&params());
        // Establish a flat range with a floor near 99.5.
        for _ in 0..15 {
            det.update(&quiet(100.0));
        }
        // Stop hunt: wick far below the range low, close reclaims, candle green.
        let out = det.update(&candle(99.8, 100.3, 100.5, 97.0));
        let grab = out.liquidity.unwrap();
        assert!(grab.bullish);
        assert_ne!(out.bos, Some(Polarity::Bearish));
        assert_ne!(out.choch, Some(Polarity::Bearish));
    }

    #[test]
    fn confirmed_swing_high_break_reports_bos() {
        let mut det = StructureDetector::new(&params());
        // Tent: rise to a peak at index 5, fall back — peak confirms at 8.
        let mut saw_break = false;
        for i in 0..9 {
            let base = 100.0 - (i as f64 - 5.0).abs();
            det.update(&quiet(base));
        }
        // Rally through the confirmed peak high (100.5).
        for i in 0..4 {
            let base = 99.0 + i as f64;
            let out = det.update(&candle(base, base + 0.8, base + 1.0, base - 0.2));
            if out.bos == Some(Polarity::Bullish) || out.choch == Some(Polarity::Bullish) {
                saw_break = true;
            }
        }
        assert!(saw_break);
    }

    #[test]
    fn fvg_touch_flag_fires_on_revisit() {
        let mut det = StructureDetector::new(&params());
        det.update(&candle(100.0, 100.5, 101.0, 99.0));
        det.update(&candle(100.5, 103.5, 104.0, 100.4));
        // Gap: low 102.0 > high[i-2] 101.0.
        det.update(&candle(103.5, 105.0, 105.5, 102.0));
        // Pull back into the gap without closing below its bottom.
        let out = det.update(&candle(105.0, 102.5, 105.2, 101.5));
        assert!(out.fvg_touch_bullish);
    }
}
