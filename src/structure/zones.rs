// =============================================================================
// Zone Arena — explicit lifecycle for order blocks and fair value gaps
// =============================================================================
//
// Zones are first-class records rather than forward-filled values, so their
// lifecycle is directly testable:
//
//   created -> active -> mitigated   (close trades through the far edge), or
//   created -> active -> evicted     (retention horizon passes untested)
//
// `active` transitions true -> false exactly once and never back; a
// mitigation index, once set, never changes.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Polarity, ZoneKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub kind: ZoneKind,
    pub polarity: Polarity,
    pub top: f64,
    pub bottom: f64,
    /// Anchor candle index (OB: the opposite candle; FVG: the middle candle).
    pub created_at: usize,
    pub active: bool,
    pub mitigated_at: Option<usize>,
}

impl Zone {
    pub fn new(kind: ZoneKind, polarity: Polarity, top: f64, bottom: f64, created_at: usize) -> Self {
        Self {
            kind,
            polarity,
            top,
            bottom,
            created_at,
            active: true,
            mitigated_at: None,
        }
    }

    /// The candle's range overlaps this zone.
    pub fn overlaps(&self, high: f64, low: f64) -> bool {
        low <= self.top && high >= self.bottom
    }

    /// A close through the far edge invalidates the zone: below the bottom
    /// for bullish zones, above the top for bearish ones.
    fn far_edge_breached(&self, close: f64) -> bool {
        match self.polarity {
            Polarity::Bullish => close < self.bottom,
            Polarity::Bearish => close > self.top,
        }
    }
}

// =============================================================================
// ZoneArena
// =============================================================================

#[derive(Debug, Clone)]
pub struct ZoneArena {
    zones: Vec<Zone>,
    retention: usize,
}

impl ZoneArena {
    pub fn new(retention: usize) -> Self {
        Self {
            zones: Vec::new(),
            retention: retention.max(1),
        }
    }

    /// Insert a zone unless one with the same kind and anchor already exists
    /// (an impulse extending over several candles proposes the same anchor
    /// repeatedly).
    pub fn try_create(&mut self, zone: Zone) -> bool {
        let duplicate = self
            .zones
            .iter()
            .any(|z| z.kind == zone.kind && z.created_at == zone.created_at);
        if duplicate {
            return false;
        }
        debug!(
            kind = %zone.kind,
            polarity = %zone.polarity,
            top = zone.top,
            bottom = zone.bottom,
            created_at = zone.created_at,
            "zone created"
        );
        self.zones.push(zone);
        true
    }

    /// Mitigate active zones whose far edge this close trades through.
    pub fn mitigate(&mut self, index: usize, close: f64) {
        for zone in self.zones.iter_mut().filter(|z| z.active) {
            if zone.far_edge_breached(close) {
                zone.active = false;
                zone.mitigated_at = Some(index);
                debug!(kind = %zone.kind, polarity = %zone.polarity, index, "zone mitigated");
            }
        }
    }

    /// Deactivate zones past the retention horizon and drop long-dead
    /// records to bound memory.
    pub fn evict(&mut self, index: usize) {
        let retention = self.retention;
        for zone in self.zones.iter_mut().filter(|z| z.active) {
            if index.saturating_sub(zone.created_at) > retention {
                zone.active = false;
                debug!(kind = %zone.kind, created_at = zone.created_at, index, "zone evicted");
            }
        }
        // Inactive zones are kept one extra horizon for post-hoc inspection.
        self.zones
            .retain(|z| z.active || index.saturating_sub(z.created_at) <= 2 * retention);
    }

    /// Does the candle range touch an active zone of this kind/polarity?
    pub fn touched(&self, kind: ZoneKind, polarity: Polarity, high: f64, low: f64) -> bool {
        self.zones
            .iter()
            .any(|z| z.active && z.kind == kind && z.polarity == polarity && z.overlaps(high, low))
    }

    pub fn active(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(|z| z.active)
    }

    pub fn all(&self) -> &[Zone] {
        &self.zones
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn bullish_ob(created_at: usize) -> Zone {
        Zone::new(ZoneKind::OrderBlock, Polarity::Bullish, 102.0, 100.0, created_at)
    }

    #[test]
    fn duplicate_anchor_rejected() {
        let mut arena = ZoneArena::new(100);
        assert!(arena.try_create(bullish_ob(5)));
        assert!(!arena.try_create(bullish_ob(5)));
        assert_eq!(arena.all().len(), 1);
    }

    #[test]
    fn mitigation_sets_index_once() {
        let mut arena = ZoneArena::new(100);
        arena.try_create(bullish_ob(5));

        // Close inside the zone does not mitigate.
        arena.mitigate(6, 101.0);
        assert!(arena.all()[0].active);

        // Close through the bottom mitigates.
        arena.mitigate(7, 99.0);
        let zone = arena.all()[0];
        assert!(!zone.active);
        assert_eq!(zone.mitigated_at, Some(7));

        // Further closes never change the record.
        arena.mitigate(8, 95.0);
        assert_eq!(arena.all()[0].mitigated_at, Some(7));
    }

    #[test]
    fn bearish_zone_mitigated_above_top() {
        let mut arena = ZoneArena::new(100);
        arena.try_create(Zone::new(
            ZoneKind::FairValueGap,
            Polarity::Bearish,
            110.0,
            108.0,
            3,
        ));
        arena.mitigate(4, 109.0); // inside: still active
        assert!(arena.all()[0].active);
        arena.mitigate(5, 111.0);
        assert!(!arena.all()[0].active);
    }

    #[test]
    fn eviction_deactivates_without_mitigation_index() {
        let mut arena = ZoneArena::new(10);
        arena.try_create(bullish_ob(0));
        arena.evict(10);
        assert!(arena.all()[0].active);
        arena.evict(11);
        let zone = arena.all()[0];
        assert!(!zone.active);
        assert_eq!(zone.mitigated_at, None);
    }

    #[test]
    fn touch_requires_overlap_and_active() {
        let mut arena = ZoneArena::new(100);
        arena.try_create(bullish_ob(5));
        assert!(arena.touched(ZoneKind::OrderBlock, Polarity::Bullish, 103.0, 101.0));
        assert!(!arena.touched(ZoneKind::OrderBlock, Polarity::Bullish, 106.0, 104.0));
        assert!(!arena.touched(ZoneKind::FairValueGap, Polarity::Bullish, 103.0, 101.0));

        arena.mitigate(6, 99.0);
        assert!(!arena.touched(ZoneKind::OrderBlock, Polarity::Bullish, 103.0, 101.0));
    }
}
