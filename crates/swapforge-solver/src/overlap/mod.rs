//! Overlap analysis and the greedy slot assignment strategies.
//!
//! All functions are stateless. Ties are broken by input order: when two
//! colors or slots are equally good, the one that comes first wins. Callers
//! that need id-based tie-breaking sort their input by id first.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use swapforge_core::{Color, ColorId, Result, SwapForgeError};
use tracing::debug;

use crate::plan::{SlotPlan, SwapDetail};

/// Stateless overlap and grouping algorithms over colors.
///
/// # Example
///
/// ```
/// use swapforge_core::Color;
/// use swapforge_solver::OverlapAnalyzer;
///
/// let colors = vec![
///     Color::from_range("T0", 0, 50, 200).unwrap(),
///     Color::from_range("T1", 51, 100, 200).unwrap(),
///     Color::from_range("T2", 20, 80, 200).unwrap(),
/// ];
///
/// let plan = OverlapAnalyzer::optimize_by_intervals(&colors, 2).unwrap();
/// assert_eq!(plan.assigned_count(), 3);
/// assert_eq!(plan.total_swaps, 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapAnalyzer;

impl OverlapAnalyzer {
    /// True iff the layer spans of `a` and `b` intersect.
    ///
    /// Spans that share their boundary layer count as overlapping.
    pub fn has_overlap(a: &Color, b: &Color) -> bool {
        a.overlaps(b)
    }

    /// Maps every color id to the ids it overlaps with.
    ///
    /// Every input id has an entry, possibly empty. A color never lists itself.
    pub fn build_overlap_matrix(colors: &[Color]) -> BTreeMap<ColorId, BTreeSet<ColorId>> {
        let mut matrix: BTreeMap<ColorId, BTreeSet<ColorId>> = colors
            .iter()
            .map(|c| (c.id().clone(), BTreeSet::new()))
            .collect();

        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                if Self::has_overlap(a, b) {
                    if let Some(set) = matrix.get_mut(a.id()) {
                        set.insert(b.id().clone());
                    }
                    if let Some(set) = matrix.get_mut(b.id()) {
                        set.insert(a.id().clone());
                    }
                }
            }
        }
        matrix
    }

    /// Greedy partition of the colors into mutually non-overlapping groups.
    ///
    /// Colors are visited in input order. Each unassigned color opens a new
    /// group, then every later unassigned color that overlaps no member of
    /// the group joins it. The partition is approximate, not minimal.
    pub fn find_non_overlapping_groups(colors: &[Color]) -> Vec<Vec<Color>> {
        Self::group_indices(colors)
            .into_iter()
            .map(|group| group.into_iter().map(|i| colors[i].clone()).collect())
            .collect()
    }

    /// Index form of [`OverlapAnalyzer::find_non_overlapping_groups`].
    pub(crate) fn group_indices(colors: &[Color]) -> Vec<Vec<usize>> {
        let mut assigned = vec![false; colors.len()];
        let mut groups = Vec::new();

        for start in 0..colors.len() {
            if assigned[start] {
                continue;
            }
            assigned[start] = true;
            let mut group = vec![start];

            for candidate in start + 1..colors.len() {
                if assigned[candidate] {
                    continue;
                }
                let fits = group
                    .iter()
                    .all(|&member| !Self::has_overlap(&colors[member], &colors[candidate]));
                if fits {
                    assigned[candidate] = true;
                    group.push(candidate);
                }
            }
            groups.push(group);
        }
        groups
    }

    /// Manual swaps needed to print a group from one slot.
    ///
    /// Sorted by first layer, the group needs one swap per adjacent pair:
    /// `max(0, len - 1)`. Independent of input order.
    pub fn calculate_swaps_for_group(group: &[Color]) -> usize {
        Self::swaps_for_size(group.len())
    }

    /// Swap cost of a slot holding `size` colors.
    pub(crate) fn swaps_for_size(size: usize) -> usize {
        size.saturating_sub(1)
    }

    /// Swap details for one slot, in first-layer order.
    ///
    /// Colors starting on the same layer are ordered by id.
    pub fn swap_details_for_group(slot: usize, group: &[Color]) -> Vec<SwapDetail> {
        let mut ordered: Vec<&Color> = group.iter().collect();
        ordered.sort_by(|a, b| {
            a.first_layer()
                .cmp(&b.first_layer())
                .then_with(|| a.id().cmp(b.id()))
        });

        ordered
            .windows(2)
            .map(|pair| SwapDetail {
                slot,
                from: pair[0].id().clone(),
                to: pair[1].id().clone(),
                after_layer: pair[0].last_layer(),
                before_layer: pair[1].first_layer(),
            })
            .collect()
    }

    /// The "groups" strategy: non-overlapping groups, largest first.
    ///
    /// With no more colors than slots every color gets its own slot. Otherwise
    /// the groups from [`OverlapAnalyzer::find_non_overlapping_groups`] are
    /// sorted by size (descending, stable) and the largest `max_slots` take
    /// one slot each. Each leftover group is merged into the slot whose swap
    /// count grows least; the first such slot wins ties.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when `max_slots` is zero.
    pub fn optimize_slot_assignments(colors: &[Color], max_slots: usize) -> Result<SlotPlan> {
        check_slots(max_slots)?;
        if colors.len() <= max_slots {
            return Ok(SlotPlan::one_per_slot(colors, max_slots));
        }

        let mut groups = Self::group_indices(colors);
        groups.sort_by_key(|group| Reverse(group.len()));

        let mut assignments: Vec<Vec<Color>> = vec![Vec::new(); max_slots];
        let mut details: Vec<Vec<SwapDetail>> = vec![Vec::new(); max_slots];
        let mut total_swaps = 0;
        let mut forced_placements = 0;

        let mut groups = groups.into_iter();
        for (slot, group) in groups.by_ref().take(max_slots).enumerate() {
            assignments[slot] = group.into_iter().map(|i| colors[i].clone()).collect();
            total_swaps += Self::calculate_swaps_for_group(&assignments[slot]);
            details[slot] = Self::swap_details_for_group(slot, &assignments[slot]);
        }

        for group in groups {
            let group: Vec<Color> = group.into_iter().map(|i| colors[i].clone()).collect();

            let (slot, increase) = assignments
                .iter()
                .enumerate()
                .map(|(slot, current)| {
                    let merged = Self::swaps_for_size(current.len() + group.len());
                    (slot, merged - Self::calculate_swaps_for_group(current))
                })
                .min_by_key(|&(slot, increase)| (increase, slot))
                .ok_or_else(|| SwapForgeError::Internal("no slot to merge into".into()))?;

            forced_placements += group
                .iter()
                .filter(|c| assignments[slot].iter().any(|m| Self::has_overlap(m, c)))
                .count();
            assignments[slot].extend(group);
            total_swaps += increase;
            details[slot] = Self::swap_details_for_group(slot, &assignments[slot]);
        }

        debug!(
            event = "groups_assigned",
            colors = colors.len(),
            slots = max_slots,
            total_swaps,
            forced_placements,
        );

        Ok(SlotPlan {
            assignments,
            total_swaps,
            swap_details: details.into_iter().flatten().collect(),
            forced_placements,
        })
    }

    /// The "intervals" strategy: greedy interval partitioning.
    ///
    /// Colors are taken by first layer (input order breaks ties). Each goes
    /// into the first slot whose latest end is strictly before the color's
    /// first layer; an empty slot always qualifies. When every slot is busy
    /// the color is forced into the slot that frees up earliest (first such
    /// slot on ties), whose end becomes the later of the two ends.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when `max_slots` is zero.
    pub fn optimize_by_intervals(colors: &[Color], max_slots: usize) -> Result<SlotPlan> {
        check_slots(max_slots)?;

        let mut order: Vec<usize> = (0..colors.len()).collect();
        order.sort_by_key(|&i| colors[i].first_layer());

        let mut assignments: Vec<Vec<Color>> = vec![Vec::new(); max_slots];
        let mut slot_ends: Vec<Option<u32>> = vec![None; max_slots];
        let mut forced_placements = 0;

        for i in order {
            let color = &colors[i];
            let free = slot_ends
                .iter()
                .position(|end| end.map_or(true, |end| end < color.first_layer()));

            let slot = match free {
                Some(slot) => {
                    slot_ends[slot] = Some(color.last_layer());
                    slot
                }
                None => {
                    let slot = slot_ends
                        .iter()
                        .enumerate()
                        .min_by_key(|&(slot, end)| (*end, slot))
                        .map(|(slot, _)| slot)
                        .ok_or_else(|| SwapForgeError::Internal("no slot available".into()))?;
                    slot_ends[slot] = slot_ends[slot].max(Some(color.last_layer()));
                    forced_placements += 1;
                    debug!(
                        event = "forced_placement",
                        color = %color.id(),
                        slot,
                    );
                    slot
                }
            };
            assignments[slot].push(color.clone());
        }

        let mut plan = SlotPlan::from_assignments(assignments);
        plan.forced_placements = forced_placements;
        Ok(plan)
    }

    /// Largest number of colors whose spans cover a single layer.
    pub fn peak_concurrency(colors: &[Color]) -> usize {
        // (layer, delta): ends sort before starts on the same layer.
        let mut events: Vec<(u64, i8)> = Vec::with_capacity(colors.len() * 2);
        for color in colors {
            events.push((u64::from(color.first_layer()), 1));
            events.push((u64::from(color.last_layer()) + 1, -1));
        }
        events.sort_unstable();

        let mut active: i64 = 0;
        let mut peak: i64 = 0;
        for (_, delta) in events {
            active += i64::from(delta);
            peak = peak.max(active);
        }
        peak as usize
    }

    /// Every unordered pair of colors that could share a slot without overlap.
    pub fn sharing_pairs(colors: &[Color]) -> Vec<(ColorId, ColorId)> {
        let mut pairs = Vec::new();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                if !Self::has_overlap(a, b) {
                    pairs.push((a.id().clone(), b.id().clone()));
                }
            }
        }
        pairs
    }
}

fn check_slots(max_slots: usize) -> Result<()> {
    if max_slots == 0 {
        return Err(SwapForgeError::Configuration(
            "at least one slot is required".to_string(),
        ));
    }
    Ok(())
}
