//! SwapForge - filament slot planning for multi-material 3D prints
//!
//! Assigns a print's colors to a small number of material slots, minimizing
//! the manual filament swaps needed when colors outnumber slots, and checks
//! whether a print can fit at all.
//!
//! # Example
//!
//! ```rust
//! use swapforge::prelude::*;
//!
//! let colors = vec![
//!     Color::from_range("T0", 0, 99, 200).unwrap(),
//!     Color::from_range("T1", 100, 199, 200).unwrap(),
//!     Color::from_range("T2", 0, 199, 200).unwrap(),
//! ];
//!
//! let config = OptimizerConfig::multi_slot_unit(1, 2);
//! let result = swapforge::optimize(&colors, &config).unwrap();
//! assert_eq!(result.manual_swaps.len(), 1);
//! assert!(result.is_valid);
//! ```
//!
//! Enable the `console` feature and call `console::init()` for formatted
//! progress output.

pub use swapforge_config::{
    Algorithm, AnnealingConfig, ConfigError, ConstraintConfig, DeviceType, OptimizerConfig,
    Strategy, TerminationConfig,
};
pub use swapforge_core::{
    merge_ranges, Color, ColorId, ColorParseError, ColorRecord, FilamentEstimate, HexColor,
    LayerCensus, LayerRange, PrintSnapshot, Result, Slot, SlotId, SwapForgeError, ToolChange,
};
pub use swapforge_solver::{
    analyze_feasibility, optimize, optimize_with_config_file, optimize_with_flag,
    AnnealingOptimizer, AnnealingResult, AnnealingStatistics, ConstraintAnalyzer,
    ConstraintViolation, FeasibilityReport, InvariantViolation, ManualSwap, MergeHistoryEntry,
    MergeResult, MergeSuggestion, MergeTransform, OptimizationResult, OverlapAnalyzer,
    SlotAssignment, SlotConfiguration, SlotPlan, SwapConfidence,
};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{Algorithm, DeviceType, OptimizerConfig, Strategy};
    pub use super::{Color, ColorId, LayerCensus, PrintSnapshot, SwapForgeError};
    pub use super::{
        ConstraintAnalyzer, FeasibilityReport, MergeTransform, OptimizationResult,
        SlotConfiguration,
    };
}
