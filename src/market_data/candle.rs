// =============================================================================
// Candle — validated OHLCV bar and per-stream key
// =============================================================================
//
// Candles are immutable once emitted and must arrive in strictly increasing
// `open_time` order.  Validation runs before any stateful component sees the
// candle; a malformed candle is a DataQuality error that halts the stream.
// =============================================================================

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// =============================================================================
// Candle
// =============================================================================

/// A single OHLCV bar.  `open_time` / `close_time` are millisecond epochs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
}

impl Candle {
    /// Typical price (high + low + close) / 3 — the source measure for
    /// WaveTrend and the MFI money flow.
    pub fn hlc3(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Midpoint of the candle's range.
    pub fn hl2(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Open time as a UTC datetime (for log lines and external reporting).
    pub fn open_time_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.open_time).single()
    }

    /// Validate the candle against the data-quality rules.
    ///
    /// `index` is the candle's position in the stream (for error reporting);
    /// `prev_open_time` is the previous accepted candle's open time, if any.
    ///
    /// Rules:
    /// - all OHLCV values finite and non-negative
    /// - high >= low, and open/close within [low, high]
    /// - close_time not before open_time
    /// - open_time strictly greater than the previous candle's, and exactly
    ///   one bar interval after it (interval = close_time - open_time + 1) —
    ///   a gap in the stream would make every rolling window treat the
    ///   discontinuity as adjacent candles
    /// - zero volume with a nonzero price range is an exchange-feed anomaly
    pub fn validate(&self, index: usize, prev_open_time: Option<i64>) -> Result<(), EngineError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(EngineError::DataQuality {
                    index,
                    detail: format!("non-finite {name}: {value}"),
                });
            }
            if value < 0.0 {
                return Err(EngineError::DataQuality {
                    index,
                    detail: format!("negative {name}: {value}"),
                });
            }
        }

        if self.high < self.low {
            return Err(EngineError::DataQuality {
                index,
                detail: format!("high {} below low {}", self.high, self.low),
            });
        }
        if self.open < self.low || self.open > self.high {
            return Err(EngineError::DataQuality {
                index,
                detail: format!(
                    "open {} outside range [{}, {}]",
                    self.open, self.low, self.high
                ),
            });
        }
        if self.close < self.low || self.close > self.high {
            return Err(EngineError::DataQuality {
                index,
                detail: format!(
                    "close {} outside range [{}, {}]",
                    self.close, self.low, self.high
                ),
            });
        }

        if self.close_time < self.open_time {
            return Err(EngineError::DataQuality {
                index,
                detail: format!(
                    "close_time {} before open_time {}",
                    self.close_time, self.open_time
                ),
            });
        }

        if let Some(prev) = prev_open_time {
            if self.open_time <= prev {
                return Err(EngineError::DataQuality {
                    index,
                    detail: format!(
                        "non-monotonic open_time: {} after {}",
                        self.open_time, prev
                    ),
                });
            }
            let interval = self.close_time - self.open_time + 1;
            if self.open_time - prev != interval {
                return Err(EngineError::DataQuality {
                    index,
                    detail: format!(
                        "gap in stream: open_time {} is not contiguous with previous {} \
                         (bar interval {} ms)",
                        self.open_time, prev, interval
                    ),
                });
            }
        }

        // A candle that moved price on zero volume is a feed anomaly.
        if self.volume == 0.0 && self.high != self.low {
            return Err(EngineError::DataQuality {
                index,
                detail: "zero volume with nonzero price range".to_string(),
            });
        }

        Ok(())
    }
}

// =============================================================================
// CandleKey
// =============================================================================

/// Identifies one candle stream: a symbol plus a bar interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandleKey {
    pub symbol: String,
    pub interval: String,
}

impl CandleKey {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
        }
    }
}

impl fmt::Display for CandleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol, self.interval)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            open_time: 1_700_000_000_000,
            open,
            high,
            low,
            close,
            volume: 100.0,
            close_time: 1_700_000_059_999,
        }
    }

    #[test]
    fn valid_candle_passes() {
        assert!(candle(100.0, 105.0, 99.0, 103.0).validate(0, None).is_ok());
    }

    #[test]
    fn hlc3_and_hl2() {
        let c = candle(100.0, 106.0, 100.0, 103.0);
        assert!((c.hlc3() - (106.0 + 100.0 + 103.0) / 3.0).abs() < 1e-12);
        assert!((c.hl2() - 103.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_nan() {
        let mut c = candle(100.0, 105.0, 99.0, 103.0);
        c.close = f64::NAN;
        let err = c.validate(3, None).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("non-finite close"));
    }

    #[test]
    fn rejects_negative_price() {
        let mut c = candle(100.0, 105.0, 99.0, 103.0);
        c.low = -1.0;
        assert!(c.validate(0, None).is_err());
    }

    #[test]
    fn rejects_inverted_range() {
        let mut c = candle(100.0, 99.0, 105.0, 100.0);
        c.open = 100.0;
        assert!(c.validate(0, None).is_err());
    }

    #[test]
    fn rejects_close_outside_range() {
        let mut c = candle(100.0, 105.0, 99.0, 103.0);
        c.close = 110.0;
        assert!(c.validate(0, None).is_err());
    }

    #[test]
    fn rejects_non_monotonic_timestamp() {
        let c = candle(100.0, 105.0, 99.0, 103.0);
        let err = c.validate(5, Some(c.open_time)).unwrap_err();
        assert!(err.to_string().contains("non-monotonic"));
    }

    #[test]
    fn accepts_contiguous_next_candle() {
        let first = candle(100.0, 105.0, 99.0, 103.0);
        let mut next = first;
        next.open_time += 60_000;
        next.close_time += 60_000;
        assert!(next.validate(1, Some(first.open_time)).is_ok());
    }

    #[test]
    fn rejects_gapped_timestamp() {
        let first = candle(100.0, 105.0, 99.0, 103.0);
        // Eight missing bars between the two candles.
        let mut gapped = first;
        gapped.open_time += 8 * 60_000;
        gapped.close_time += 8 * 60_000;
        let err = gapped.validate(1, Some(first.open_time)).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("not contiguous"));
    }

    #[test]
    fn rejects_close_time_before_open_time() {
        let mut c = candle(100.0, 105.0, 99.0, 103.0);
        c.close_time = c.open_time - 1;
        assert!(c.validate(0, None).is_err());
    }

    #[test]
    fn rejects_zero_volume_with_price_range() {
        let mut c = candle(100.0, 105.0, 99.0, 103.0);
        c.volume = 0.0;
        assert!(c.validate(0, None).is_err());

        // A flat candle with zero volume is legitimate (quiet bar).
        let mut flat = candle(100.0, 100.0, 100.0, 100.0);
        flat.volume = 0.0;
        assert!(flat.validate(0, None).is_ok());
    }

    #[test]
    fn open_time_converts_to_utc() {
        let c = candle(100.0, 105.0, 99.0, 103.0);
        let dt = c.open_time_utc().unwrap();
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn candle_key_display() {
        let key = CandleKey::new("BTCUSDT", "5m");
        assert_eq!(key.to_string(), "BTCUSDT@5m");
    }
}
