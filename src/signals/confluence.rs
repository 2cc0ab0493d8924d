// =============================================================================
// Confluence Scorer — bull/bear counts, weighted structure score, sizing
// =============================================================================
//
// Recomputed fresh every candle from the other components' current outputs;
// holds no cross-candle state of its own.
//
// - Bull/bear count: how many of the three flip-style trend machines
//   (SuperTrend, HalfTrend, QQE) currently report that direction (0–3).
// - Weighted score: fixed points per structural signal present on this
//   candle — order-block touch 2, FVG touch 1, liquidity grab 3, BOS 2,
//   CHoCH 3.  Tuned constants, preserved exactly.
// - Gating: the count required to confirm a direction is raised to 3 under
//   HIGH_VOL and relaxed to 1 otherwise (unknown regime gates as NORMAL).
// - Size multiplier: 1.0 + dominant_score * boost_per_point, clamped to the
//   configured ceiling.  This, not a boolean, is the externally consumed
//   sizing artifact.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::config::ConfluenceParams;
use crate::types::{Direction, Polarity, VolRegime};

/// Snapshot of the per-candle component outputs the scorer consumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfluenceInput {
    pub supertrend: Option<Direction>,
    pub halftrend: Option<Direction>,
    pub qqe: Option<Direction>,
    pub regime: Option<VolRegime>,
    pub bos: Option<Polarity>,
    pub choch: Option<Polarity>,
    pub ob_touch_bullish: bool,
    pub ob_touch_bearish: bool,
    pub fvg_touch_bullish: bool,
    pub fvg_touch_bearish: bool,
    pub liquidity_bullish: bool,
    pub liquidity_bearish: bool,
}

/// The scorer's per-candle output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceRecord {
    pub bull_count: usize,
    pub bear_count: usize,
    pub weighted_bull_score: f64,
    pub weighted_bear_score: f64,
    /// `None` while the regime lookback is still filling.
    pub regime: Option<VolRegime>,
    pub bull_confirmed: bool,
    pub bear_confirmed: bool,
    pub size_multiplier: f64,
}

// =============================================================================
// ConfluenceScorer
// =============================================================================

#[derive(Debug, Clone)]
pub struct ConfluenceScorer {
    params: ConfluenceParams,
}

impl ConfluenceScorer {
    pub fn new(params: ConfluenceParams) -> Self {
        Self { params }
    }

    pub fn score(&self, input: &ConfluenceInput) -> ConfluenceRecord {
        let p = &self.params;

        let directions = [input.supertrend, input.halftrend, input.qqe];
        let bull_count = directions
            .iter()
            .filter(|d| matches!(d, Some(Direction::Bullish)))
            .count();
        let bear_count = directions
            .iter()
            .filter(|d| matches!(d, Some(Direction::Bearish)))
            .count();

        let mut bull_score = 0.0;
        let mut bear_score = 0.0;
        if input.ob_touch_bullish {
            bull_score += p.weight_order_block;
        }
        if input.ob_touch_bearish {
            bear_score += p.weight_order_block;
        }
        if input.fvg_touch_bullish {
            bull_score += p.weight_fvg;
        }
        if input.fvg_touch_bearish {
            bear_score += p.weight_fvg;
        }
        if input.liquidity_bullish {
            bull_score += p.weight_liquidity_grab;
        }
        if input.liquidity_bearish {
            bear_score += p.weight_liquidity_grab;
        }
        match input.bos {
            Some(Polarity::Bullish) => bull_score += p.weight_bos,
            Some(Polarity::Bearish) => bear_score += p.weight_bos,
            None => {}
        }
        match input.choch {
            Some(Polarity::Bullish) => bull_score += p.weight_choch,
            Some(Polarity::Bearish) => bear_score += p.weight_choch,
            None => {}
        }

        // Stricter gating under expanded volatility; unknown gates as NORMAL.
        let required = match input.regime {
            Some(VolRegime::HighVol) => p.min_count_high_vol,
            _ => p.min_count_normal,
        };
        let bull_confirmed = bull_count >= required;
        let bear_confirmed = bear_count >= required;

        // The dominant confirmed side drives sizing; a tie stays flat.
        let dominant_score = if bull_confirmed && (!bear_confirmed || bull_count > bear_count) {
            Some(bull_score)
        } else if bear_confirmed && (!bull_confirmed || bear_count > bull_count) {
            Some(bear_score)
        } else {
            None
        };
        let size_multiplier = match dominant_score {
            Some(score) => (1.0 + score * p.boost_per_point).min(p.size_ceiling),
            None => 1.0,
        };

        ConfluenceRecord {
            bull_count,
            bear_count,
            weighted_bull_score: bull_score,
            weighted_bear_score: bear_score,
            regime: input.regime,
            bull_confirmed,
            bear_confirmed,
            size_multiplier,
        }
    }
}
