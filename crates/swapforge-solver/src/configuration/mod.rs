//! Slot configuration: owns the slots of one optimization run.
//!
//! [`SlotConfiguration::assign_colors`] dispatches to the selected strategy
//! and settles every slot as permanent or shared. Manual swaps, validity and
//! the final [`OptimizationResult`] are derived from the slot contents.

mod swaps;

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use serde::Serialize;
use swapforge_config::{Algorithm, OptimizerConfig, Strategy};
use swapforge_core::{Color, ColorId, LayerRange, Result, Slot, SlotId, SwapForgeError};
use tracing::debug;

use crate::annealing::{AnnealingOptimizer, AnnealingStatistics};
use crate::overlap::OverlapAnalyzer;
use crate::plan::SlotPlan;
use crate::result::{ConfigurationSummary, OptimizationResult, SharingPair, SlotAssignment};

pub use swaps::{ManualSwap, SwapConfidence, TimingOptions};

/// Two overlapping colors found in the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvariantViolation {
    pub slot: SlotId,
    pub first: ColorId,
    pub second: ColorId,
    /// Intersection of the two colors' spans.
    pub shared_layers: LayerRange,
}

/// Slots of one printer setup and the colors assigned to them.
///
/// Slots are created once, ordered by unit then index, and refilled on every
/// [`SlotConfiguration::assign_colors`] call.
///
/// # Example
///
/// ```
/// use swapforge_config::OptimizerConfig;
/// use swapforge_core::Color;
/// use swapforge_solver::SlotConfiguration;
///
/// let colors = vec![
///     Color::from_range("T0", 0, 49, 100).unwrap(),
///     Color::from_range("T1", 50, 99, 100).unwrap(),
///     Color::from_range("T2", 0, 99, 100).unwrap(),
/// ];
///
/// let mut configuration = SlotConfiguration::new(&OptimizerConfig::multi_slot_unit(1, 2)).unwrap();
/// configuration.assign_colors(&colors).unwrap();
///
/// assert!(configuration.is_valid());
/// assert_eq!(configuration.manual_swaps().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SlotConfiguration {
    config: OptimizerConfig,
    slots: Vec<Slot>,
    colors: Vec<Color>,
    terminate: Option<Arc<AtomicBool>>,
    annealing_statistics: Option<AnnealingStatistics>,
    forced_placements: usize,
}

impl SlotConfiguration {
    /// Creates every slot of the configured layout.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when the layout or the annealing parameters
    /// are invalid.
    pub fn new(config: &OptimizerConfig) -> Result<Self> {
        config.validate()?;

        let mut slots = Vec::with_capacity(config.total_slots());
        for unit in 1..=config.unit_count {
            for index in 1..=config.slots_per_unit {
                let id = SlotId::new(slot_number(unit)?, slot_number(index)?);
                slots.push(Slot::new(id));
            }
        }

        Ok(Self {
            config: config.clone(),
            slots,
            colors: Vec::new(),
            terminate: None,
            annealing_statistics: None,
            forced_placements: 0,
        })
    }

    /// Flag that stops a running annealing optimization early.
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate = Some(flag);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    /// Statistics of the last annealing run, if annealing produced the assignment.
    pub fn annealing_statistics(&self) -> Option<&AnnealingStatistics> {
        self.annealing_statistics.as_ref()
    }

    /// Colors placed into a slot they overlap with in the last assignment.
    pub fn forced_placements(&self) -> usize {
        self.forced_placements
    }

    /// Clears every slot and assigns `colors` with the configured strategy.
    ///
    /// With no more colors than slots each color gets its own slot, in slot
    /// order. Afterwards slots holding exactly one color are permanent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidColor` when two colors share an id.
    pub fn assign_colors(&mut self, colors: &[Color]) -> Result<()> {
        let mut seen = BTreeSet::new();
        for color in colors {
            if !seen.insert(color.id()) {
                return Err(SwapForgeError::InvalidColor(format!(
                    "duplicate color id {}",
                    color.id()
                )));
            }
        }

        for slot in &mut self.slots {
            slot.clear();
        }
        self.colors = colors.to_vec();
        self.annealing_statistics = None;
        self.forced_placements = 0;

        let total = self.slots.len();
        if colors.len() <= total {
            debug!(
                event = "strategy_selected",
                strategy = "one_per_slot",
                colors = colors.len(),
                slots = total,
            );
            for (slot, color) in self.slots.iter_mut().zip(colors) {
                slot.assign(color.clone());
            }
        } else {
            debug!(
                event = "strategy_selected",
                strategy = ?self.config.strategy,
                algorithm = ?self.config.algorithm,
                colors = colors.len(),
                slots = total,
            );
            match (self.config.strategy, self.config.algorithm) {
                (Strategy::Legacy, _) => self.assign_legacy(colors),
                (_, Algorithm::SimulatedAnnealing) => {
                    let mut optimizer = AnnealingOptimizer::from_config(&self.config)?;
                    if let Some(flag) = &self.terminate {
                        optimizer = optimizer.with_terminate_flag(Arc::clone(flag));
                    }
                    let result = optimizer.optimize(colors)?;
                    self.fill(result.plan);
                    self.annealing_statistics = Some(result.statistics);
                }
                (Strategy::Groups, Algorithm::Greedy) => {
                    let plan = OverlapAnalyzer::optimize_slot_assignments(colors, total)?;
                    self.fill(plan);
                }
                (Strategy::Intervals, Algorithm::Greedy) => {
                    let plan = OverlapAnalyzer::optimize_by_intervals(colors, total)?;
                    self.fill(plan);
                }
            }
        }

        for slot in &mut self.slots {
            slot.settle();
        }
        Ok(())
    }

    /// Most-used colors get their own slot; everything else shares the last one.
    ///
    /// Colors are ranked by usage count (input order on ties). The shared
    /// slot is filled with its largest non-overlapping group first, then the
    /// remaining colors, which are forced in.
    fn assign_legacy(&mut self, colors: &[Color]) {
        let mut ranked: Vec<&Color> = colors.iter().collect();
        ranked.sort_by_key(|color| Reverse(color.usage_count()));

        let permanent = self.slots.len() - 1;
        for (slot, color) in self.slots.iter_mut().zip(&ranked[..permanent]) {
            slot.assign((*color).clone());
        }

        let rest: Vec<Color> = ranked[permanent..].iter().map(|&c| c.clone()).collect();
        let mut groups = OverlapAnalyzer::find_non_overlapping_groups(&rest);
        groups.sort_by_key(|group| Reverse(group.len()));
        self.forced_placements = rest.len() - groups.first().map_or(0, Vec::len);

        if let Some(shared) = self.slots.last_mut() {
            for color in groups.into_iter().flatten() {
                shared.assign(color);
            }
        }
    }

    fn fill(&mut self, plan: SlotPlan) {
        self.forced_placements = plan.forced_placements;
        for (slot, group) in self.slots.iter_mut().zip(plan.assignments) {
            for color in group {
                slot.assign(color);
            }
        }
    }

    /// Swaps needed for every shared slot, ordered by layer then slot.
    ///
    /// Swaps with the same colors at the same layer are reported once.
    pub fn manual_swaps(&self) -> Vec<ManualSwap> {
        let mut swaps: Vec<ManualSwap> = self
            .slots
            .iter()
            .filter(|slot| slot.is_shared())
            .flat_map(|slot| swaps::swaps_for_slot(slot.id(), slot.colors()))
            .collect();

        swaps.sort_by(|a, b| a.at_layer.cmp(&b.at_layer).then_with(|| a.slot.cmp(&b.slot)));

        let mut seen = BTreeSet::new();
        swaps.retain(|swap| {
            seen.insert((
                swap.from_color.clone(),
                swap.to_color.clone(),
                swap.at_layer,
            ))
        });
        swaps
    }

    /// True iff no slot holds two overlapping colors.
    pub fn is_valid(&self) -> bool {
        self.slots.iter().all(Slot::is_valid)
    }

    /// Every pair of overlapping colors sharing a slot.
    pub fn invariant_violations(&self) -> Vec<InvariantViolation> {
        self.slots
            .iter()
            .flat_map(|slot| {
                slot.overlapping_pairs().map(move |(a, b)| InvariantViolation {
                    slot: slot.id(),
                    first: a.id().clone(),
                    second: b.id().clone(),
                    shared_layers: LayerRange::new(
                        a.first_layer().max(b.first_layer()),
                        a.last_layer().min(b.last_layer()),
                    ),
                })
            })
            .collect()
    }

    /// Summarizes the current assignment.
    pub fn result(&self) -> OptimizationResult {
        let slot_assignments = self
            .slots
            .iter()
            .map(|slot| SlotAssignment {
                unit: slot.unit(),
                slot: slot.index(),
                slot_id: slot.id().to_string(),
                colors: slot.colors().iter().map(|c| c.id().clone()).collect(),
                is_permanent: slot.is_permanent(),
            })
            .collect();

        let manual_swaps = self.manual_swaps();
        let estimated_time_saved = manual_swaps.len() as u64 * self.config.seconds_per_swap;
        let can_share_slots = OverlapAnalyzer::sharing_pairs(&self.colors)
            .into_iter()
            .map(|(first, second)| SharingPair { first, second })
            .collect();

        OptimizationResult {
            total_colors: self.colors.len(),
            required_slots: self.colors.len(),
            peak_concurrent_colors: OverlapAnalyzer::peak_concurrency(&self.colors),
            total_slots: self.slots.len(),
            slot_assignments,
            manual_swaps,
            estimated_time_saved,
            can_share_slots,
            configuration: ConfigurationSummary::from(&self.config),
            is_valid: self.is_valid(),
            annealing: self.annealing_statistics.clone(),
        }
    }
}

fn slot_number(n: u32) -> Result<u8> {
    u8::try_from(n)
        .map_err(|_| SwapForgeError::Configuration(format!("slot number {n} out of range")))
}

#[cfg(test)]
mod tests;
