// =============================================================================
// Signal Engine — per-candle pipeline and multi-stream registry
// =============================================================================
//
// One `SignalEngine` owns every stateful component for a single
// (instrument, timeframe) context.  Candles are applied strictly in
// timestamp order; each application is a complete checkpoint, so callers may
// stop between candles and resume later.
//
// Batch and incremental processing share the same `process` step, which
// makes fold-over-history and live single-candle updates bit-identical by
// construction.
//
// A data-quality violation poisons the engine: the offending candle mutates
// no state and every later call is refused, because a malformed candle
// silently absorbed would corrupt every stateful component downstream.
// =============================================================================

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::market_data::{Candle, CandleKey};
use crate::oscillators::{
    Choppiness, SqueezeMomentum, SqueezeOutput, VixFix, VixFixOutput, WaveTrend, WaveTrendOutput,
};
use crate::signals::{ConfluenceInput, ConfluenceRecord, ConfluenceScorer};
use crate::structure::{
    LiquidityEvent, StructureDetector, StructureOutput, SwingPoint, Zone,
};
use crate::trend::{AlphaTrend, AlphaTrendOutput, HalfTrend, Qqe, QqeOutput, SuperTrend, TrendOutput};
use crate::types::Polarity;
use crate::volatility::{AtrState, RegimeReading, RegimeState};

// =============================================================================
// SignalRecord
// =============================================================================

/// The complete per-candle output record handed to the decision layer.
///
/// `None` always means "not yet computable", never "computed and negative".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    pub index: usize,
    pub open_time: i64,
    pub close: f64,

    // --- Volatility core -----------------------------------------------------
    pub true_range: f64,
    pub atr: Option<f64>,
    pub regime: Option<RegimeReading>,

    // --- Trend state machines ------------------------------------------------
    pub supertrend: Option<TrendOutput>,
    pub halftrend: Option<TrendOutput>,
    pub alphatrend: AlphaTrendOutput,
    pub qqe: Option<QqeOutput>,

    // --- Oscillators ---------------------------------------------------------
    pub wavetrend: Option<WaveTrendOutput>,
    pub squeeze: Option<SqueezeOutput>,
    pub choppiness: Option<f64>,
    pub vixfix: Option<VixFixOutput>,

    // --- Market structure ----------------------------------------------------
    /// Swings confirmed on this candle (their index lies `w` in the past).
    pub swings: Vec<SwingPoint>,
    pub bos: Option<Polarity>,
    pub choch: Option<Polarity>,
    pub liquidity: Option<LiquidityEvent>,
    pub ob_touch_bullish: bool,
    pub ob_touch_bearish: bool,
    pub fvg_touch_bullish: bool,
    pub fvg_touch_bearish: bool,
    pub active_zones: Vec<Zone>,

    // --- Confluence ----------------------------------------------------------
    pub confluence: ConfluenceRecord,
    /// Mirror of `confluence.size_multiplier` — the externally consumed
    /// sizing artifact.
    pub size_multiplier: f64,
}

// =============================================================================
// SignalEngine
// =============================================================================

#[derive(Debug)]
pub struct SignalEngine {
    atr: AtrState,
    regime: RegimeState,
    supertrend: SuperTrend,
    halftrend: HalfTrend,
    alphatrend: AlphaTrend,
    qqe: Qqe,
    wavetrend: WaveTrend,
    squeeze: SqueezeMomentum,
    choppiness: Choppiness,
    vixfix: VixFix,
    structure: StructureDetector,
    scorer: ConfluenceScorer,
    next_index: usize,
    prev_open_time: Option<i64>,
    poisoned_at: Option<usize>,
}

impl SignalEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            atr: AtrState::new(config.atr_period),
            regime: RegimeState::new(config.regime.clone()),
            supertrend: SuperTrend::new(&config.supertrend),
            halftrend: HalfTrend::new(&config.halftrend, config.atr_period),
            alphatrend: AlphaTrend::new(&config.alphatrend),
            qqe: Qqe::new(&config.qqe),
            wavetrend: WaveTrend::new(&config.wavetrend),
            squeeze: SqueezeMomentum::new(&config.squeeze),
            choppiness: Choppiness::new(config.choppiness_period),
            vixfix: VixFix::new(&config.vixfix),
            structure: StructureDetector::new(&config.structure),
            scorer: ConfluenceScorer::new(config.confluence.clone()),
            next_index: 0,
            prev_open_time: None,
            poisoned_at: None,
        }
    }

    /// Number of candles applied so far.
    pub fn candles_seen(&self) -> usize {
        self.next_index
    }

    /// Apply the next candle and produce its output record.
    ///
    /// Returns `DataQuality` (and poisons the engine) on a malformed candle;
    /// `StreamPoisoned` on any call after that.
    pub fn process(&mut self, candle: &Candle) -> Result<SignalRecord, EngineError> {
        if let Some(index) = self.poisoned_at {
            return Err(EngineError::StreamPoisoned { index });
        }

        let index = self.next_index;
        if let Err(err) = candle.validate(index, self.prev_open_time) {
            warn!(index, %err, "rejecting candle, halting stream");
            self.poisoned_at = Some(index);
            return Err(err);
        }

        // --- Volatility core -------------------------------------------------
        let (true_range, atr) = self.atr.update(candle);
        let regime: Option<RegimeReading> = match atr {
            Some(atr) => self.regime.update(atr),
            None => None,
        };

        // --- Trend state machines --------------------------------------------
        let supertrend = self.supertrend.update(candle);
        let halftrend = self.halftrend.update(candle);
        let alphatrend = self.alphatrend.update(candle);
        let qqe = self.qqe.update(candle.close);

        // --- Oscillators ------------------------------------------------------
        let wavetrend = self.wavetrend.update(candle);
        let squeeze = self.squeeze.update(candle);
        let choppiness = self.choppiness.update(candle);
        let vixfix = self.vixfix.update(candle);

        // --- Market structure -------------------------------------------------
        let StructureOutput {
            swings,
            bos,
            choch,
            liquidity,
            ob_touch_bullish,
            ob_touch_bearish,
            fvg_touch_bullish,
            fvg_touch_bearish,
        } = self.structure.update(candle);

        // --- Confluence -------------------------------------------------------
        let confluence = self.scorer.score(&ConfluenceInput {
            supertrend: supertrend.map(|t| t.direction),
            halftrend: halftrend.map(|t| t.direction),
            qqe: qqe.map(|q| q.direction),
            regime: regime.map(|r| r.regime),
            bos,
            choch,
            ob_touch_bullish,
            ob_touch_bearish,
            fvg_touch_bullish,
            fvg_touch_bearish,
            liquidity_bullish: liquidity.map(|l| l.bullish).unwrap_or(false),
            liquidity_bearish: liquidity.map(|l| l.bearish).unwrap_or(false),
        });

        debug!(
            index,
            close = candle.close,
            bull = confluence.bull_count,
            bear = confluence.bear_count,
            size = confluence.size_multiplier,
            "candle processed"
        );

        self.prev_open_time = Some(candle.open_time);
        self.next_index += 1;

        Ok(SignalRecord {
            index,
            open_time: candle.open_time,
            close: candle.close,
            true_range,
            atr,
            regime,
            supertrend,
            halftrend,
            alphatrend,
            qqe,
            wavetrend,
            squeeze,
            choppiness,
            vixfix,
            swings,
            bos,
            choch,
            liquidity,
            ob_touch_bullish,
            ob_touch_bearish,
            fvg_touch_bullish,
            fvg_touch_bearish,
            active_zones: self.structure.active_zones().copied().collect(),
            size_multiplier: confluence.size_multiplier,
            confluence,
        })
    }

    /// Full zone history for this stream, including mitigated and evicted
    /// records.
    pub fn zones(&self) -> &[Zone] {
        self.structure.zones()
    }

    /// Apply an ordered history of candles; equivalent to repeated
    /// `process` calls (and tested to be bit-identical to them).
    pub fn process_batch(&mut self, candles: &[Candle]) -> Result<Vec<SignalRecord>, EngineError> {
        let mut records = Vec::with_capacity(candles.len());
        for candle in candles {
            records.push(self.process(candle)?);
        }
        Ok(records)
    }
}

// =============================================================================
// EngineRegistry
// =============================================================================

/// Holds one independent engine per (symbol, interval) stream.
///
/// Streams share nothing; the lock only guards the map itself, so multiple
/// instruments can be driven from separate workers with coarse locking.
pub struct EngineRegistry {
    config: EngineConfig,
    engines: RwLock<HashMap<CandleKey, SignalEngine>>,
}

impl EngineRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            engines: RwLock::new(HashMap::new()),
        }
    }

    /// Route a candle to its stream's engine, creating the engine on first
    /// contact.
    pub fn process(&self, key: &CandleKey, candle: &Candle) -> Result<SignalRecord, EngineError> {
        let mut engines = self.engines.write();
        let engine = engines
            .entry(key.clone())
            .or_insert_with(|| SignalEngine::new(&self.config));
        engine.process(candle)
    }

    /// Tear down one stream's context (e.g. a poisoned stream being reset).
    pub fn remove(&self, key: &CandleKey) -> bool {
        self.engines.write().remove(key).is_some()
    }

    pub fn stream_count(&self) -> usize {
        self.engines.read().len()
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            open_time: 1_700_000_000_000 + (i as i64) * 60_000,
            open,
            high,
            low,
            close,
            volume: 100.0,
            close_time: 1_700_000_000_000 + (i as i64) * 60_000 + 59_999,
        }
    }

    fn wavy_history(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.05;
                candle(i, base, base + 1.2, base - 1.2, base + 0.4)
            })
            .collect()
    }

    #[test]
    fn early_candles_report_undefined_not_zero() {
        let mut engine = SignalEngine::new(&EngineConfig::default());
        let record = engine.process(&wavy_history(1)[0]).unwrap();
        assert!(record.atr.is_none());
        assert!(record.regime.is_none());
        assert!(record.supertrend.is_none());
        assert!(record.qqe.is_none());
        assert!(record.choppiness.is_none());
        assert!(record.liquidity.is_none());
        assert_eq!(record.confluence.bull_count, 0);
        assert!((record.size_multiplier - 1.0).abs() < 1e-12);
    }

    #[test]
    fn warm_engine_reports_all_core_fields() {
        let mut engine = SignalEngine::new(&EngineConfig::default());
        let records = engine.process_batch(&wavy_history(120)).unwrap();
        let last = records.last().unwrap();
        assert!(last.atr.is_some());
        assert!(last.regime.is_some());
        assert!(last.supertrend.is_some());
        assert!(last.halftrend.is_some());
        assert!(last.alphatrend.direction.is_some());
        assert!(last.qqe.is_some());
        assert!(last.wavetrend.is_some());
        assert!(last.squeeze.is_some());
        assert!(last.choppiness.is_some());
        assert!(last.vixfix.is_some());
        assert!(last.liquidity.is_some());
    }

    #[test]
    fn malformed_candle_poisons_the_stream() {
        let mut engine = SignalEngine::new(&EngineConfig::default());
        let history = wavy_history(10);
        engine.process_batch(&history).unwrap();

        let mut bad = candle(10, 100.0, 101.0, 99.0, 100.0);
        bad.low = f64::NAN;
        let err = engine.process(&bad).unwrap_err();
        assert!(matches!(err, EngineError::DataQuality { index: 10, .. }));

        // Every subsequent candle is refused, even a valid one.
        let good = candle(11, 100.0, 101.0, 99.0, 100.0);
        let err = engine.process(&good).unwrap_err();
        assert!(matches!(err, EngineError::StreamPoisoned { index: 10 }));
    }

    #[test]
    fn gapped_candle_is_rejected() {
        let mut engine = SignalEngine::new(&EngineConfig::default());
        engine.process(&candle(0, 100.0, 101.0, 99.0, 100.0)).unwrap();
        engine.process(&candle(1, 100.0, 101.0, 99.0, 100.0)).unwrap();

        // Eight bars missing from the feed: the stream is not contiguous.
        let err = engine
            .process(&candle(10, 100.0, 101.0, 99.0, 100.0))
            .unwrap_err();
        assert!(matches!(err, EngineError::DataQuality { index: 2, .. }));
        assert!(err.to_string().contains("not contiguous"));
    }

    #[test]
    fn out_of_order_candle_is_rejected() {
        let mut engine = SignalEngine::new(&EngineConfig::default());
        engine.process(&candle(5, 100.0, 101.0, 99.0, 100.0)).unwrap();
        let err = engine
            .process(&candle(4, 100.0, 101.0, 99.0, 100.0))
            .unwrap_err();
        assert!(matches!(err, EngineError::DataQuality { .. }));
    }

    #[test]
    fn registry_isolates_streams() {
        let registry = EngineRegistry::new(EngineConfig::default());
        let btc = CandleKey::new("BTCUSDT", "5m");
        let eth = CandleKey::new("ETHUSDT", "5m");

        for (i, c) in wavy_history(20).iter().enumerate() {
            registry.process(&btc, c).unwrap();
            if i < 10 {
                registry.process(&eth, c).unwrap();
            }
        }
        assert_eq!(registry.stream_count(), 2);

        // Poison ETH; BTC keeps processing.
        let mut bad = candle(10, 100.0, 101.0, 99.0, 100.0);
        bad.volume = -1.0;
        assert!(registry.process(&eth, &bad).is_err());
        assert!(registry
            .process(&btc, &candle(20, 100.0, 101.0, 99.0, 100.0))
            .is_ok());

        assert!(registry.remove(&eth));
        assert_eq!(registry.stream_count(), 1);
    }

    #[test]
    fn record_serialises_to_json() {
        let mut engine = SignalEngine::new(&EngineConfig::default());
        let records = engine.process_batch(&wavy_history(60)).unwrap();
        let json = serde_json::to_string(records.last().unwrap()).unwrap();
        assert!(json.contains("\"size_multiplier\""));
        assert!(json.contains("\"confluence\""));
    }
}
