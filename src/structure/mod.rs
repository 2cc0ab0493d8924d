// =============================================================================
// Market Structure Module
// =============================================================================
//
// Smart-money-concepts detectors over raw candles:
// - confirmed swing points (centered window, w candles late)
// - BOS / CHoCH breaks against confirmed swing levels
// - order blocks and fair value gaps in an explicit zone arena
// - liquidity grabs beyond rolling extremes

pub mod breaks;
pub mod detector;
pub mod fvg;
pub mod liquidity;
pub mod order_blocks;
pub mod swings;
pub mod zones;

pub use breaks::{BreakDetector, BreakEvent};
pub use detector::{StructureDetector, StructureOutput};
pub use fvg::FvgDetector;
pub use liquidity::{LiquidityDetector, LiquidityEvent};
pub use order_blocks::OrderBlockDetector;
pub use swings::{SwingPoint, SwingTracker};
pub use zones::{Zone, ZoneArena};
