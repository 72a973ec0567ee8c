//! Configuration system for SwapForge.
//!
//! Load optimizer configuration from TOML or YAML files to control the slot
//! layout, assignment strategy and annealing parameters without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use swapforge_config::{OptimizerConfig, Strategy};
//! use std::time::Duration;
//!
//! let config = OptimizerConfig::from_toml_str(r#"
//!     device = "multi_slot_unit"
//!     unit_count = 2
//!     slots_per_unit = 4
//!     strategy = "groups"
//!
//!     [termination]
//!     millis_spent_limit = 500
//! "#).unwrap();
//!
//! assert_eq!(config.total_slots(), 8);
//! assert_eq!(config.strategy, Strategy::Groups);
//! assert_eq!(config.time_limit(), Some(Duration::from_millis(500)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use swapforge_config::OptimizerConfig;
//!
//! let config = OptimizerConfig::load("swapforge.toml").unwrap_or_default();
//! // Proceeds with a single four-slot unit if the file doesn't exist
//! assert_eq!(config.total_slots(), 4);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use swapforge_core::SwapForgeError;
use thiserror::Error;

/// Highest accepted unit count.
pub const MAX_UNITS: u32 = 16;

/// Highest accepted slot count per unit.
pub const MAX_SLOTS_PER_UNIT: u32 = 4;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SwapForgeError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(msg) => SwapForgeError::Configuration(msg),
            other => SwapForgeError::Configuration(other.to_string()),
        }
    }
}

/// Main optimizer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OptimizerConfig {
    /// Kind of printer hardware the slots belong to.
    #[serde(default)]
    pub device: DeviceType,

    /// Number of units (material boxes or toolheads).
    #[serde(default = "default_unit_count")]
    pub unit_count: u32,

    /// Slots in each unit.
    #[serde(default = "default_slots_per_unit")]
    pub slots_per_unit: u32,

    /// Strategy used when colors outnumber slots.
    #[serde(default)]
    pub strategy: Strategy,

    /// Optimizer driving the groups/intervals strategies.
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Random seed for reproducible annealing runs.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Simulated annealing parameters.
    #[serde(default)]
    pub annealing: AnnealingConfig,

    /// Wall-clock bounds for the annealing loop.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Feasibility analysis parameters.
    #[serde(default)]
    pub constraints: ConstraintConfig,

    /// Seconds a manual swap costs the operator.
    #[serde(default = "default_seconds_per_swap")]
    pub seconds_per_swap: u64,
}

fn default_unit_count() -> u32 {
    1
}

fn default_slots_per_unit() -> u32 {
    4
}

fn default_seconds_per_swap() -> u64 {
    120
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            device: DeviceType::default(),
            unit_count: default_unit_count(),
            slots_per_unit: default_slots_per_unit(),
            strategy: Strategy::default(),
            algorithm: Algorithm::default(),
            random_seed: None,
            annealing: AnnealingConfig::default(),
            termination: None,
            constraints: ConstraintConfig::default(),
            seconds_per_swap: default_seconds_per_swap(),
        }
    }
}

impl OptimizerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for `unit_count` material units of `slots_per_unit` slots.
    pub fn multi_slot_unit(unit_count: u32, slots_per_unit: u32) -> Self {
        Self {
            device: DeviceType::MultiSlotUnit,
            unit_count,
            slots_per_unit,
            ..Self::default()
        }
    }

    /// Configuration for `toolheads` independent single-slot toolheads.
    pub fn single_toolhead(toolheads: u32) -> Self {
        Self {
            device: DeviceType::SingleToolhead,
            unit_count: toolheads,
            slots_per_unit: 1,
            ..Self::default()
        }
    }

    /// Loads configuration from a file, YAML for `.yaml`/`.yml`, TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the assignment strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the optimizer algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Replaces the annealing parameters.
    pub fn with_annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.annealing = annealing;
        self
    }

    /// Sets the annealing time limit in milliseconds.
    pub fn with_termination_millis(mut self, millis: u64) -> Self {
        self.termination = Some(TerminationConfig {
            millis_spent_limit: Some(millis),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Total number of physical slots.
    pub fn total_slots(&self) -> usize {
        self.unit_count as usize * self.slots_per_unit as usize
    }

    /// Returns the annealing time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Checks the slot layout and numeric parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when the unit count is outside
    /// `1..=16`, the slots per unit outside `1..=4`, a single-toolhead
    /// layout has more than one slot per unit, or an annealing parameter
    /// is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_count == 0 || self.slots_per_unit == 0 {
            return Err(ConfigError::Invalid(format!(
                "slot count must be positive (unit_count = {}, slots_per_unit = {})",
                self.unit_count, self.slots_per_unit
            )));
        }
        if self.unit_count > MAX_UNITS {
            return Err(ConfigError::Invalid(format!(
                "unit_count {} outside 1..={MAX_UNITS}",
                self.unit_count
            )));
        }
        if self.slots_per_unit > MAX_SLOTS_PER_UNIT {
            return Err(ConfigError::Invalid(format!(
                "slots_per_unit {} outside 1..={MAX_SLOTS_PER_UNIT}",
                self.slots_per_unit
            )));
        }
        if self.device == DeviceType::SingleToolhead && self.slots_per_unit != 1 {
            return Err(ConfigError::Invalid(format!(
                "single toolhead units hold one slot, got {}",
                self.slots_per_unit
            )));
        }
        self.annealing.validate()
    }
}

/// Kind of printer hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// One slot per toolhead, several toolheads.
    SingleToolhead,

    /// Automatic material units with several slots each.
    #[default]
    MultiSlotUnit,
}

/// Assignment strategy used when colors outnumber slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Most-used colors get permanent slots, the rest share the last slot.
    Legacy,

    /// Non-overlapping groups, largest groups first.
    Groups,

    /// Interval partitioning by start layer.
    #[default]
    Intervals,
}

/// Optimizer behind the groups/intervals strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Deterministic greedy heuristics.
    #[default]
    Greedy,

    /// Randomized simulated annealing.
    SimulatedAnnealing,
}

/// Simulated annealing parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AnnealingConfig {
    /// Starting temperature.
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f64,

    /// Multiplicative temperature decay per iteration.
    #[serde(default = "default_cooling_rate")]
    pub cooling_rate: f64,

    /// Maximum number of iterations.
    #[serde(default = "default_iterations")]
    pub iterations: u64,

    /// Temperature floor.
    #[serde(default = "default_min_temperature")]
    pub min_temperature: f64,
}

fn default_initial_temperature() -> f64 {
    10_000.0
}

fn default_cooling_rate() -> f64 {
    0.995
}

fn default_iterations() -> u64 {
    10_000
}

fn default_min_temperature() -> f64 {
    0.1
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: default_initial_temperature(),
            cooling_rate: default_cooling_rate(),
            iterations: default_iterations(),
            min_temperature: default_min_temperature(),
        }
    }
}

impl AnnealingConfig {
    /// Sets the iteration budget.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_temperature > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "cooling_rate must be in (0, 1], got {}",
                self.cooling_rate
            )));
        }
        if !(self.min_temperature > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        Ok(())
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum milliseconds to spend annealing.
    pub millis_spent_limit: Option<u64>,

    /// Maximum seconds to spend annealing.
    pub seconds_spent_limit: Option<u64>,

    /// Iterations between deadline and cancellation checks.
    pub check_interval: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self
            .seconds_spent_limit
            .unwrap_or(0)
            .saturating_mul(1000)
            .saturating_add(self.millis_spent_limit.unwrap_or(0));
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

/// Feasibility analysis configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConstraintConfig {
    /// Merge suggestions emitted per violation range.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions_per_range: usize,

    /// Largest hex distance at which two colors are proposed for merging.
    #[serde(default)]
    pub similarity_threshold: Option<f64>,
}

fn default_max_suggestions() -> usize {
    5
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            max_suggestions_per_range: default_max_suggestions(),
            similarity_threshold: None,
        }
    }
}

#[cfg(test)]
mod tests;
