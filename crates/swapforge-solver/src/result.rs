//! Optimization output consumed by export and display layers.

use serde::Serialize;
use swapforge_config::{Algorithm, DeviceType, OptimizerConfig, Strategy};
use swapforge_core::ColorId;

use crate::annealing::AnnealingStatistics;
use crate::configuration::ManualSwap;

/// Contents of one physical slot after optimization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotAssignment {
    /// 1-based unit number.
    pub unit: u8,
    /// 1-based slot index within the unit.
    pub slot: u8,
    /// `"{unit}-{slot}"`.
    pub slot_id: String,
    pub colors: Vec<ColorId>,
    pub is_permanent: bool,
}

/// Two colors that never overlap and could share a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharingPair {
    pub first: ColorId,
    pub second: ColorId,
}

/// The settings an optimization ran with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationSummary {
    pub device: DeviceType,
    pub unit_count: u32,
    pub slots_per_unit: u32,
    pub strategy: Strategy,
    pub algorithm: Algorithm,
}

impl From<&OptimizerConfig> for ConfigurationSummary {
    fn from(config: &OptimizerConfig) -> Self {
        Self {
            device: config.device,
            unit_count: config.unit_count,
            slots_per_unit: config.slots_per_unit,
            strategy: config.strategy,
            algorithm: config.algorithm,
        }
    }
}

/// Complete result of assigning a print's colors to slots.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub total_colors: usize,
    /// Slots needed to print without any manual swap.
    pub required_slots: usize,
    /// Most colors active on a single layer.
    pub peak_concurrent_colors: usize,
    pub total_slots: usize,
    pub slot_assignments: Vec<SlotAssignment>,
    pub manual_swaps: Vec<ManualSwap>,
    /// Seconds of hands-on time the swap plan accounts for.
    pub estimated_time_saved: u64,
    pub can_share_slots: Vec<SharingPair>,
    pub configuration: ConfigurationSummary,
    /// False when some slot holds overlapping colors.
    pub is_valid: bool,
    /// Present when the annealing optimizer produced the assignment.
    pub annealing: Option<AnnealingStatistics>,
}

impl OptimizationResult {
    /// Number of manual swaps in the plan.
    pub fn swap_count(&self) -> usize {
        self.manual_swaps.len()
    }

    /// The slot holding `id`, if any.
    pub fn slot_of(&self, id: &ColorId) -> Option<&SlotAssignment> {
        self.slot_assignments
            .iter()
            .find(|assignment| assignment.colors.contains(id))
    }
}
