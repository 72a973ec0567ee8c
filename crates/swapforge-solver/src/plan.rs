//! Slot plans produced by the optimizers.

use serde::Serialize;
use swapforge_core::{Color, ColorId};

use crate::overlap::OverlapAnalyzer;

/// One filament change inside a planned slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapDetail {
    /// 0-based slot position in the plan.
    pub slot: usize,
    pub from: ColorId,
    pub to: ColorId,
    /// Last layer of the outgoing color.
    pub after_layer: u32,
    /// First layer of the incoming color.
    pub before_layer: u32,
}

/// Result shape shared by the greedy strategies and the annealing optimizer.
///
/// `assignments[i]` holds the colors of the `i`-th slot (0-based), in the
/// order they were placed. Every input color appears in exactly one slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotPlan {
    pub assignments: Vec<Vec<Color>>,
    pub total_swaps: usize,
    pub swap_details: Vec<SwapDetail>,
    /// Colors placed into a slot they overlap with because no free slot existed.
    pub forced_placements: usize,
}

impl SlotPlan {
    /// One color per slot, no swaps. Slots beyond the color count stay empty.
    pub fn one_per_slot(colors: &[Color], max_slots: usize) -> Self {
        let mut assignments = vec![Vec::new(); max_slots.max(colors.len())];
        for (slot, color) in colors.iter().enumerate() {
            assignments[slot].push(color.clone());
        }
        Self {
            assignments,
            total_swaps: 0,
            swap_details: Vec::new(),
            forced_placements: 0,
        }
    }

    /// Builds a plan from slot contents, computing swaps for every slot.
    pub fn from_assignments(assignments: Vec<Vec<Color>>) -> Self {
        let mut plan = Self {
            assignments,
            ..Self::default()
        };
        plan.total_swaps = plan
            .assignments
            .iter()
            .map(|group| OverlapAnalyzer::calculate_swaps_for_group(group))
            .sum();
        plan.recompute_details();
        plan
    }

    /// Rebuilds `swap_details` from the current slot contents.
    pub fn recompute_details(&mut self) {
        self.swap_details = self
            .assignments
            .iter()
            .enumerate()
            .flat_map(|(slot, group)| OverlapAnalyzer::swap_details_for_group(slot, group))
            .collect();
    }

    /// Number of colors across all slots.
    pub fn assigned_count(&self) -> usize {
        self.assignments.iter().map(Vec::len).sum()
    }

    /// Number of slots holding at least one color.
    pub fn slots_in_use(&self) -> usize {
        self.assignments.iter().filter(|g| !g.is_empty()).count()
    }

    /// 0-based slot holding the color, if any.
    pub fn slot_of(&self, id: &ColorId) -> Option<usize> {
        self.assignments
            .iter()
            .position(|group| group.iter().any(|c| c.id() == id))
    }
}
