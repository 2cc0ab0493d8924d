// =============================================================================
// Engine Configuration — per-instrument/timeframe settings with atomic save
// =============================================================================
//
// One `EngineConfig` is supplied per (instrument, timeframe) context.  Every
// tunable parameter of every component lives here; there are no module-level
// or process-wide mutable defaults.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// Several constants (structural-signal weights, regime gating thresholds)
// are empirically tuned values preserved exactly for compatibility; change
// them only deliberately.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_atr_period() -> usize {
    14
}

fn default_regime_lookback() -> usize {
    50
}

fn default_regime_high_z() -> f64 {
    1.5
}

fn default_regime_low_z() -> f64 {
    -0.5
}

fn default_regime_high_mult() -> f64 {
    1.5
}

fn default_regime_normal_mult() -> f64 {
    1.0
}

fn default_regime_low_mult() -> f64 {
    0.8
}

fn default_supertrend_period() -> usize {
    10
}

fn default_supertrend_multiplier() -> f64 {
    3.0
}

fn default_halftrend_amplitude() -> usize {
    2
}

fn default_halftrend_deviation() -> f64 {
    2.0
}

fn default_alphatrend_period() -> usize {
    14
}

fn default_alphatrend_coeff() -> f64 {
    1.0
}

fn default_qqe_rsi_period() -> usize {
    14
}

fn default_qqe_smoothing() -> usize {
    5
}

fn default_qqe_factor() -> f64 {
    4.238
}

fn default_wt_channel() -> usize {
    10
}

fn default_wt_average() -> usize {
    21
}

fn default_wt_signal() -> usize {
    4
}

fn default_wt_overbought() -> f64 {
    60.0
}

fn default_wt_oversold() -> f64 {
    -60.0
}

fn default_bb_length() -> usize {
    20
}

fn default_bb_mult() -> f64 {
    2.0
}

fn default_kc_length() -> usize {
    20
}

fn default_kc_mult() -> f64 {
    1.5
}

fn default_momentum_length() -> usize {
    12
}

fn default_chop_period() -> usize {
    14
}

fn default_vixfix_lookback() -> usize {
    22
}

fn default_swing_window() -> usize {
    10
}

fn default_impulse_candles() -> usize {
    3
}

fn default_impulse_pct() -> f64 {
    0.02
}

fn default_zone_retention() -> usize {
    200
}

fn default_weight_order_block() -> f64 {
    2.0
}

fn default_weight_fvg() -> f64 {
    1.0
}

fn default_weight_liquidity_grab() -> f64 {
    3.0
}

fn default_weight_bos() -> f64 {
    2.0
}

fn default_weight_choch() -> f64 {
    3.0
}

fn default_min_count_high_vol() -> usize {
    3
}

fn default_min_count_normal() -> usize {
    1
}

fn default_boost_per_point() -> f64 {
    0.03
}

fn default_size_ceiling() -> f64 {
    1.3
}

// =============================================================================
// Per-component parameter structs
// =============================================================================

/// Volatility-regime classifier parameters (§ volatility::regime).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeParams {
    /// Lookback window over the ATR series for mean/std of the z-score.
    #[serde(default = "default_regime_lookback")]
    pub lookback: usize,

    /// z-score above which the regime is HIGH_VOL.
    #[serde(default = "default_regime_high_z")]
    pub high_z: f64,

    /// z-score below which the regime is LOW_VOL.
    #[serde(default = "default_regime_low_z")]
    pub low_z: f64,

    /// Size multiplier applied under HIGH_VOL.
    #[serde(default = "default_regime_high_mult")]
    pub high_mult: f64,

    /// Size multiplier applied under NORMAL.
    #[serde(default = "default_regime_normal_mult")]
    pub normal_mult: f64,

    /// Size multiplier applied under LOW_VOL.
    #[serde(default = "default_regime_low_mult")]
    pub low_mult: f64,
}

impl Default for RegimeParams {
    fn default() -> Self {
        Self {
            lookback: default_regime_lookback(),
            high_z: default_regime_high_z(),
            low_z: default_regime_low_z(),
            high_mult: default_regime_high_mult(),
            normal_mult: default_regime_normal_mult(),
            low_mult: default_regime_low_mult(),
        }
    }
}

/// SuperTrend parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperTrendParams {
    #[serde(default = "default_supertrend_period")]
    pub period: usize,

    #[serde(default = "default_supertrend_multiplier")]
    pub multiplier: f64,
}

impl Default for SuperTrendParams {
    fn default() -> Self {
        Self {
            period: default_supertrend_period(),
            multiplier: default_supertrend_multiplier(),
        }
    }
}

/// HalfTrend parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalfTrendParams {
    /// Rolling window for the high/low midline.
    #[serde(default = "default_halftrend_amplitude")]
    pub amplitude: usize,

    /// ATR multiplier for the channel around the midline.
    #[serde(default = "default_halftrend_deviation")]
    pub channel_deviation: f64,
}

impl Default for HalfTrendParams {
    fn default() -> Self {
        Self {
            amplitude: default_halftrend_amplitude(),
            channel_deviation: default_halftrend_deviation(),
        }
    }
}

/// AlphaTrend parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlphaTrendParams {
    /// Shared period for ATR and the MFI momentum gate.
    #[serde(default = "default_alphatrend_period")]
    pub period: usize,

    /// ATR coefficient for the support/resistance bands.
    #[serde(default = "default_alphatrend_coeff")]
    pub coeff: f64,
}

impl Default for AlphaTrendParams {
    fn default() -> Self {
        Self {
            period: default_alphatrend_period(),
            coeff: default_alphatrend_coeff(),
        }
    }
}

/// QQE parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QqeParams {
    #[serde(default = "default_qqe_rsi_period")]
    pub rsi_period: usize,

    /// EMA length applied to RSI before banding.
    #[serde(default = "default_qqe_smoothing")]
    pub smoothing: usize,

    /// Band width factor applied to the smoothed ATR-of-RSI.
    #[serde(default = "default_qqe_factor")]
    pub factor: f64,
}

impl Default for QqeParams {
    fn default() -> Self {
        Self {
            rsi_period: default_qqe_rsi_period(),
            smoothing: default_qqe_smoothing(),
            factor: default_qqe_factor(),
        }
    }
}

/// WaveTrend parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveTrendParams {
    #[serde(default = "default_wt_channel")]
    pub channel_length: usize,

    #[serde(default = "default_wt_average")]
    pub average_length: usize,

    /// SMA length for the signal line (wt2).
    #[serde(default = "default_wt_signal")]
    pub signal_length: usize,

    #[serde(default = "default_wt_overbought")]
    pub overbought: f64,

    #[serde(default = "default_wt_oversold")]
    pub oversold: f64,
}

impl Default for WaveTrendParams {
    fn default() -> Self {
        Self {
            channel_length: default_wt_channel(),
            average_length: default_wt_average(),
            signal_length: default_wt_signal(),
            overbought: default_wt_overbought(),
            oversold: default_wt_oversold(),
        }
    }
}

/// Squeeze-momentum parameters (Bollinger vs Keltner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqueezeParams {
    #[serde(default = "default_bb_length")]
    pub bb_length: usize,

    #[serde(default = "default_bb_mult")]
    pub bb_mult: f64,

    #[serde(default = "default_kc_length")]
    pub kc_length: usize,

    #[serde(default = "default_kc_mult")]
    pub kc_mult: f64,

    /// SMA length for the momentum companion value.
    #[serde(default = "default_momentum_length")]
    pub momentum_length: usize,
}

impl Default for SqueezeParams {
    fn default() -> Self {
        Self {
            bb_length: default_bb_length(),
            bb_mult: default_bb_mult(),
            kc_length: default_kc_length(),
            kc_mult: default_kc_mult(),
            momentum_length: default_momentum_length(),
        }
    }
}

/// Williams VixFix parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VixFixParams {
    /// Highest-close lookback for the panic measure.
    #[serde(default = "default_vixfix_lookback")]
    pub lookback: usize,

    #[serde(default = "default_bb_length")]
    pub bb_length: usize,

    #[serde(default = "default_bb_mult")]
    pub bb_mult: f64,
}

impl Default for VixFixParams {
    fn default() -> Self {
        Self {
            lookback: default_vixfix_lookback(),
            bb_length: default_bb_length(),
            bb_mult: default_bb_mult(),
        }
    }
}

/// Market-structure detector parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureParams {
    /// Swing-confirmation window `w` (confirmation is `w` candles late).
    #[serde(default = "default_swing_window")]
    pub swing_window: usize,

    /// Consecutive same-direction candles that declare an impulse.
    #[serde(default = "default_impulse_candles")]
    pub impulse_candles: usize,

    /// Single-candle body move (fraction of open) that declares an impulse.
    #[serde(default = "default_impulse_pct")]
    pub impulse_pct: f64,

    /// Candles after which an unmitigated zone is evicted.
    #[serde(default = "default_zone_retention")]
    pub zone_retention: usize,
}

impl Default for StructureParams {
    fn default() -> Self {
        Self {
            swing_window: default_swing_window(),
            impulse_candles: default_impulse_candles(),
            impulse_pct: default_impulse_pct(),
            zone_retention: default_zone_retention(),
        }
    }
}

/// Confluence-scorer weights and gating.
///
/// The point values and regime thresholds are tuned constants carried over
/// verbatim; compatibility tests depend on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfluenceParams {
    #[serde(default = "default_weight_order_block")]
    pub weight_order_block: f64,

    #[serde(default = "default_weight_fvg")]
    pub weight_fvg: f64,

    #[serde(default = "default_weight_liquidity_grab")]
    pub weight_liquidity_grab: f64,

    #[serde(default = "default_weight_bos")]
    pub weight_bos: f64,

    #[serde(default = "default_weight_choch")]
    pub weight_choch: f64,

    /// Required bull/bear count under HIGH_VOL (stricter).
    #[serde(default = "default_min_count_high_vol")]
    pub min_count_high_vol: usize,

    /// Required bull/bear count under NORMAL and LOW_VOL.
    #[serde(default = "default_min_count_normal")]
    pub min_count_normal: usize,

    /// Size-multiplier boost per structural point.
    #[serde(default = "default_boost_per_point")]
    pub boost_per_point: f64,

    /// Ceiling on the size multiplier.
    #[serde(default = "default_size_ceiling")]
    pub size_ceiling: f64,
}

impl Default for ConfluenceParams {
    fn default() -> Self {
        Self {
            weight_order_block: default_weight_order_block(),
            weight_fvg: default_weight_fvg(),
            weight_liquidity_grab: default_weight_liquidity_grab(),
            weight_bos: default_weight_bos(),
            weight_choch: default_weight_choch(),
            min_count_high_vol: default_min_count_high_vol(),
            min_count_normal: default_min_count_normal(),
            boost_per_point: default_boost_per_point(),
            size_ceiling: default_size_ceiling(),
        }
    }
}

// =============================================================================
// EngineConfig
// =============================================================================

/// Top-level configuration for one signal-engine context.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Shared ATR period for the volatility core.
    #[serde(default = "default_atr_period")]
    pub atr_period: usize,

    #[serde(default)]
    pub regime: RegimeParams,

    #[serde(default)]
    pub supertrend: SuperTrendParams,

    #[serde(default)]
    pub halftrend: HalfTrendParams,

    #[serde(default)]
    pub alphatrend: AlphaTrendParams,

    #[serde(default)]
    pub qqe: QqeParams,

    #[serde(default)]
    pub wavetrend: WaveTrendParams,

    #[serde(default)]
    pub squeeze: SqueezeParams,

    /// Choppiness Index period.
    #[serde(default = "default_chop_period")]
    pub choppiness_period: usize,

    #[serde(default)]
    pub vixfix: VixFixParams,

    #[serde(default)]
    pub structure: StructureParams,

    #[serde(default)]
    pub confluence: ConfluenceParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            atr_period: default_atr_period(),
            regime: RegimeParams::default(),
            supertrend: SuperTrendParams::default(),
            halftrend: HalfTrendParams::default(),
            alphatrend: AlphaTrendParams::default(),
            qqe: QqeParams::default(),
            wavetrend: WaveTrendParams::default(),
            squeeze: SqueezeParams::default(),
            choppiness_period: default_chop_period(),
            vixfix: VixFixParams::default(),
            structure: StructureParams::default(),
            confluence: ConfluenceParams::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse engine config from {}", path.display()))?;

        info!(
            path = %path.display(),
            atr_period = config.atr_period,
            swing_window = config.structure.swing_window,
            "engine config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    ///
    /// This prevents corruption if the process crashes mid-write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise engine config")?;

        // Atomic write: write to a temporary sibling file, then rename.
        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "engine config saved (atomic)");
        Ok(())
    }
}
