//! Top-level entry points.

use std::io;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use swapforge_config::{ConfigError, OptimizerConfig};
use swapforge_core::{Color, PrintSnapshot, Result};
use tracing::{debug, info};

use crate::configuration::SlotConfiguration;
use crate::constraint::{ConstraintAnalyzer, FeasibilityReport};
use crate::result::OptimizationResult;

/// Assigns `colors` to the slots described by `config`.
///
/// Logs `optimize_start` and `optimize_end` at INFO.
///
/// # Errors
///
/// Returns `Configuration` for an invalid slot layout and `InvalidColor`
/// for duplicate color ids.
///
/// # Example
///
/// ```
/// use swapforge_config::{ConfigError, OptimizerConfig};
/// use swapforge_core::Color;
/// use swapforge_solver::optimize;
///
/// let colors: Vec<Color> = (0..6)
///     .map(|i| Color::from_range(format!("T{i}"), i * 20, i * 20 + 19, 120).unwrap())
///     .collect();
///
/// let result = optimize(&colors, &OptimizerConfig::multi_slot_unit(1, 4)).unwrap();
/// assert_eq!(result.total_colors, 6);
/// assert!(result.is_valid);
/// ```
pub fn optimize(colors: &[Color], config: &OptimizerConfig) -> Result<OptimizationResult> {
    optimize_with_flag(colors, config, None)
}

/// Like [`optimize`], with a flag that stops a running annealing optimization.
///
/// A stopped run still returns a complete assignment: the best one found.
pub fn optimize_with_flag(
    colors: &[Color],
    config: &OptimizerConfig,
    terminate: Option<Arc<AtomicBool>>,
) -> Result<OptimizationResult> {
    let started = Instant::now();
    info!(
        event = "optimize_start",
        colors = colors.len(),
        slots = config.total_slots(),
        strategy = ?config.strategy,
        algorithm = ?config.algorithm,
    );

    let mut configuration = SlotConfiguration::new(config)?;
    if let Some(flag) = terminate {
        configuration = configuration.with_terminate_flag(flag);
    }
    configuration.assign_colors(colors)?;
    let result = configuration.result();

    info!(
        event = "optimize_end",
        duration_ms = started.elapsed().as_millis() as u64,
        swaps = result.manual_swaps.len(),
        slots_used = result
            .slot_assignments
            .iter()
            .filter(|a| !a.colors.is_empty())
            .count(),
        is_valid = result.is_valid,
    );
    Ok(result)
}

/// Like [`optimize`], reading the configuration from a TOML or YAML file
/// (see [`OptimizerConfig::load`]).
///
/// A missing file falls back to the default configuration.
///
/// # Errors
///
/// Returns `Configuration` when the file cannot be read or parsed.
pub fn optimize_with_config_file(
    colors: &[Color],
    path: impl AsRef<Path>,
) -> Result<OptimizationResult> {
    let path = path.as_ref();
    let config = match OptimizerConfig::load(path) {
        Ok(config) => config,
        Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            debug!(event = "config_defaulted", path = %path.display());
            OptimizerConfig::default()
        }
        Err(err) => return Err(err.into()),
    };
    optimize(colors, &config)
}

/// Checks whether the snapshot's census fits into the configured slots.
pub fn analyze_feasibility(
    snapshot: &PrintSnapshot,
    config: &OptimizerConfig,
) -> Result<FeasibilityReport> {
    Ok(ConstraintAnalyzer::from_config(config)?.analyze_snapshot(snapshot))
}
