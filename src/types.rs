// =============================================================================
// Core Types — shared enums for the signal engine
// =============================================================================
//
// Small, copyable enums used across every component.  Each carries serde
// derives (they appear in the per-candle output record) and a `Display`
// impl for log lines.
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Direction
// =============================================================================

/// Trend direction reported by the stateful trend indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
    /// Upward trend — the indicator's lower/support band is active.
    #[default]
    Bullish,
    /// Downward trend — the indicator's upper/resistance band is active.
    Bearish,
}

impl Direction {
    /// Flip to the opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Bullish => Direction::Bearish,
            Direction::Bearish => Direction::Bullish,
        }
    }

    pub fn is_bullish(self) -> bool {
        self == Direction::Bullish
    }

    pub fn is_bearish(self) -> bool {
        self == Direction::Bearish
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bullish => write!(f, "BULLISH"),
            Direction::Bearish => write!(f, "BEARISH"),
        }
    }
}

// =============================================================================
// Polarity
// =============================================================================

/// Polarity of a structural signal or zone (order block, FVG, break).
///
/// Distinct from `Direction`: a `Direction` is the running state of a trend
/// machine, while a `Polarity` tags a one-shot event or a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Bullish,
    Bearish,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Bullish => write!(f, "BULLISH"),
            Polarity::Bearish => write!(f, "BEARISH"),
        }
    }
}

// =============================================================================
// VolRegime
// =============================================================================

/// Volatility regime classified from the ATR z-score (see `volatility::regime`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VolRegime {
    /// ATR z-score > 1.5 — expanded volatility, wider tolerances.
    HighVol,
    /// ATR z-score in [-0.5, 1.5] — baseline conditions.
    #[default]
    Normal,
    /// ATR z-score < -0.5 — compressed volatility.
    LowVol,
}

impl VolRegime {
    /// Position-size multiplier associated with the regime.
    ///
    /// HighVol widens stops and tolerance (1.5), LowVol tightens (0.8),
    /// Normal is the 1.0 baseline.
    pub fn size_multiplier(self) -> f64 {
        match self {
            VolRegime::HighVol => 1.5,
            VolRegime::Normal => 1.0,
            VolRegime::LowVol => 0.8,
        }
    }
}

impl fmt::Display for VolRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolRegime::HighVol => write!(f, "HIGH_VOL"),
            VolRegime::Normal => write!(f, "NORMAL"),
            VolRegime::LowVol => write!(f, "LOW_VOL"),
        }
    }
}

// =============================================================================
// SwingKind / ZoneKind
// =============================================================================

/// Which extreme a swing point marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwingKind {
    High,
    Low,
}

impl fmt::Display for SwingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwingKind::High => write!(f, "HIGH"),
            SwingKind::Low => write!(f, "LOW"),
        }
    }
}

/// Kind of structural zone tracked by the zone arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    OrderBlock,
    FairValueGap,
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneKind::OrderBlock => write!(f, "ORDER_BLOCK"),
            ZoneKind::FairValueGap => write!(f, "FVG"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_defaults_bullish() {
        assert_eq!(Direction::default(), Direction::Bullish);
        assert!(Direction::default().is_bullish());
    }

    #[test]
    fn direction_opposite_roundtrip() {
        assert_eq!(Direction::Bullish.opposite(), Direction::Bearish);
        assert_eq!(Direction::Bearish.opposite().opposite(), Direction::Bearish);
    }

    #[test]
    fn regime_multipliers() {
        assert!((VolRegime::HighVol.size_multiplier() - 1.5).abs() < f64::EPSILON);
        assert!((VolRegime::Normal.size_multiplier() - 1.0).abs() < f64::EPSILON);
        assert!((VolRegime::LowVol.size_multiplier() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn display_labels() {
        assert_eq!(VolRegime::HighVol.to_string(), "HIGH_VOL");
        assert_eq!(Polarity::Bearish.to_string(), "BEARISH");
        assert_eq!(ZoneKind::FairValueGap.to_string(), "FVG");
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&VolRegime::LowVol).unwrap();
        let back: VolRegime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VolRegime::LowVol);
    }
}
