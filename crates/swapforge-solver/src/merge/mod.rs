//! Color merging over a whole print snapshot.
//!
//! A merge folds one or more source colors into a target color and rewrites
//! every structure that mentions them. The input snapshot is never modified;
//! the result carries a new snapshot with the next version.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use swapforge_core::{
    merge_ranges, Color, ColorId, FilamentEstimate, LayerCensus, LayerRange, PrintSnapshot,
    ToolChange,
};
use tracing::{info, warn};

use crate::constraint::MergeSuggestion;

/// Record of one applied merge, for undo/redo bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeHistoryEntry {
    pub target_id: ColorId,
    pub source_ids: Vec<ColorId>,
    /// Layers on which a source color was used.
    pub affected_layers: BTreeSet<u32>,
    /// Tools no longer needed after the merge.
    pub freed_slots: Vec<ColorId>,
    pub from_version: u64,
    pub to_version: u64,
}

/// A merged snapshot and its history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub snapshot: PrintSnapshot,
    pub history: MergeHistoryEntry,
}

/// Pure color merge transformation.
///
/// # Example
///
/// ```
/// use swapforge_core::{Color, ColorId, PrintSnapshot};
/// use swapforge_solver::MergeTransform;
///
/// let snapshot = PrintSnapshot::from_colors(vec![
///     Color::from_range("A", 0, 9, 30).unwrap(),
///     Color::from_range("B", 20, 29, 30).unwrap(),
/// ]);
///
/// let result = MergeTransform::apply(&snapshot, &ColorId::from("A"), &[ColorId::from("B")]).unwrap();
/// assert_eq!(result.snapshot.colors.len(), 1);
/// assert_eq!(result.snapshot.colors[0].last_layer(), 29);
/// assert_eq!(snapshot.colors.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeTransform;

impl MergeTransform {
    /// Merges `source_ids` into `target_id`.
    ///
    /// Returns `None` without touching anything when the target or a source
    /// is missing, no source is given, or a source equals the target.
    /// Repeated source ids count once.
    pub fn apply(
        snapshot: &PrintSnapshot,
        target_id: &ColorId,
        source_ids: &[ColorId],
    ) -> Option<MergeResult> {
        let mut sources: Vec<ColorId> = Vec::with_capacity(source_ids.len());
        for id in source_ids {
            if !sources.contains(id) {
                sources.push(id.clone());
            }
        }

        if sources.is_empty() {
            warn!(event = "merge_rejected", target = %target_id, reason = "no source colors");
            return None;
        }
        if sources.contains(target_id) {
            warn!(event = "merge_rejected", target = %target_id, reason = "target listed as source");
            return None;
        }
        let Some(target) = snapshot.color(target_id) else {
            warn!(event = "merge_rejected", target = %target_id, reason = "unknown target");
            return None;
        };
        let mut source_colors = Vec::with_capacity(sources.len());
        for id in &sources {
            let Some(color) = snapshot.color(id) else {
                warn!(event = "merge_rejected", target = %target_id, source = %id, reason = "unknown source");
                return None;
            };
            source_colors.push(color);
        }

        let merged = merge_colors(target, &source_colors)?;
        let is_source = |id: &ColorId| sources.contains(id);
        let substitute = |id: &ColorId| {
            if is_source(id) {
                target_id.clone()
            } else {
                id.clone()
            }
        };

        let colors: Vec<Color> = snapshot
            .colors
            .iter()
            .filter(|c| !is_source(c.id()))
            .map(|c| if c.id() == target_id { merged.clone() } else { c.clone() })
            .collect();

        let tool_changes: Vec<ToolChange> = snapshot
            .tool_changes
            .iter()
            .map(|change| ToolChange {
                layer: change.layer,
                from_tool: substitute(&change.from_tool),
                to_tool: substitute(&change.to_tool),
            })
            .filter(|change| change.from_tool != change.to_tool)
            .collect();

        let census: LayerCensus = snapshot
            .census
            .iter()
            .map(|(layer, active)| {
                let ids: Vec<ColorId> = active.iter().map(&substitute).collect();
                (layer, ids)
            })
            .collect();

        let mut target_ranges: Vec<LayerRange> = Vec::new();
        let mut usage_ranges: BTreeMap<ColorId, Vec<LayerRange>> = BTreeMap::new();
        for (id, ranges) in &snapshot.usage_ranges {
            if id == target_id || is_source(id) {
                target_ranges.extend(ranges.iter().copied());
            } else {
                usage_ranges.insert(id.clone(), ranges.clone());
            }
        }
        target_ranges.extend(merged.usage_ranges());
        usage_ranges.insert(target_id.clone(), merge_ranges(target_ranges));

        let mut combined: Option<FilamentEstimate> = None;
        let mut filament_estimates: BTreeMap<ColorId, FilamentEstimate> = BTreeMap::new();
        for (id, estimate) in &snapshot.filament_estimates {
            if id == target_id || is_source(id) {
                *combined.get_or_insert_with(FilamentEstimate::default) += *estimate;
            } else {
                filament_estimates.insert(id.clone(), *estimate);
            }
        }
        if let Some(estimate) = combined {
            filament_estimates.insert(target_id.clone(), estimate);
        }

        let affected_layers: BTreeSet<u32> = source_colors
            .iter()
            .flat_map(|c| c.layers_used().iter().copied())
            .collect();

        let to_version = snapshot.version + 1;
        let merged_snapshot = PrintSnapshot {
            version: to_version,
            total_layers: snapshot.total_layers.max(merged.total_layers()),
            colors,
            tool_changes,
            census,
            usage_ranges,
            filament_estimates,
        };

        info!(
            event = "merge_applied",
            target = %target_id,
            sources = sources.len(),
            affected_layers = affected_layers.len(),
            version = to_version,
        );

        Some(MergeResult {
            snapshot: merged_snapshot,
            history: MergeHistoryEntry {
                target_id: target_id.clone(),
                freed_slots: sources.clone(),
                source_ids: sources,
                affected_layers,
                from_version: snapshot.version,
                to_version,
            },
        })
    }

    /// Folds a suggestion's secondary color into its primary color.
    pub fn apply_suggestion(
        snapshot: &PrintSnapshot,
        suggestion: &MergeSuggestion,
    ) -> Option<MergeResult> {
        Self::apply(
            snapshot,
            &suggestion.primary_color,
            std::slice::from_ref(&suggestion.secondary_color),
        )
    }
}

/// The target with the union of all layers, keeping its id, name and hex.
///
/// A layer stays partial only if no merged color is dominant on it.
fn merge_colors(target: &Color, sources: &[&Color]) -> Option<Color> {
    let all = || std::iter::once(target).chain(sources.iter().copied());

    let layers: BTreeSet<u32> = all()
        .flat_map(|c| c.layers_used().iter().copied())
        .collect();
    let dominant: BTreeSet<u32> = all()
        .flat_map(|c| c.layers_used().difference(c.partial_layers()).copied())
        .collect();
    let partial: BTreeSet<u32> = all()
        .flat_map(|c| c.partial_layers().iter().copied())
        .filter(|layer| !dominant.contains(layer))
        .collect();
    let total_layers = all().map(Color::total_layers).max().unwrap_or(0);

    let merged = match Color::from_layers(target.id().clone(), layers, total_layers) {
        Ok(color) => color,
        Err(err) => {
            warn!(event = "merge_rejected", target = %target.id(), reason = %err);
            return None;
        }
    };
    let merged = merged
        .with_name(target.name())
        .with_partial_layers(partial);
    Some(match target.hex() {
        Some(hex) => merged.with_hex(hex),
        None => merged,
    })
}
