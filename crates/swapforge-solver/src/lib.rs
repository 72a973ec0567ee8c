//! SwapForge Solver Engine
//!
//! This crate provides the slot planning engine including:
//! - Overlap analysis and the greedy groups/intervals strategies
//! - Simulated annealing as an alternative optimizer
//! - `SlotConfiguration`, which fills physical slots and derives manual swaps
//! - Feasibility analysis with merge suggestions
//! - The color merge transformation over whole print snapshots
//!
//! Logging levels:
//! - **INFO**: Optimization start/end, annealing phase summaries, merges
//! - **DEBUG**: Strategy selection, forced placements, violation ranges, progress
//! - **TRACE**: Individual annealing moves

pub mod annealing;
pub mod configuration;
pub mod constraint;
pub mod merge;
pub mod optimizer;
pub mod overlap;
pub mod plan;
pub mod result;

pub use annealing::{
    AnnealingMove, AnnealingOptimizer, AnnealingResult, AnnealingScope, AnnealingStatistics,
    ExternalTermination, IterationTermination, MetropolisAcceptor, OrTermination, Termination,
    TimeTermination,
};
pub use configuration::{
    InvariantViolation, ManualSwap, SlotConfiguration, SwapConfidence, TimingOptions,
};
pub use constraint::{
    ConstraintAnalyzer, ConstraintViolation, FeasibilityReport, LayerDetail, LayerStatus,
    MergeImpact, MergeSuggestion,
};
pub use merge::{MergeHistoryEntry, MergeResult, MergeTransform};
pub use optimizer::{
    analyze_feasibility, optimize, optimize_with_config_file, optimize_with_flag,
};
pub use overlap::OverlapAnalyzer;
pub use plan::{SlotPlan, SwapDetail};
pub use result::{ConfigurationSummary, OptimizationResult, SharingPair, SlotAssignment};
