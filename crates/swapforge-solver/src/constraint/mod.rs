//! Feasibility analysis on a per-layer color census.
//!
//! Independent of any slot assignment: a layer is impossible when more colors
//! are active on it than there are slots. Consecutive impossible layers form
//! a violation range, and each range proposes color merges that would shrink
//! it.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use swapforge_config::OptimizerConfig;
use swapforge_core::{Color, ColorId, LayerCensus, PrintSnapshot, Result, SwapForgeError};
use tracing::debug;

/// Default number of merge suggestions kept per violation range.
const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Feasibility of a single layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayerStatus {
    pub layer: u32,
    /// Number of active colors.
    pub active: usize,
    pub feasible: bool,
}

/// An impossible layer inside a violation range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerDetail {
    pub layer: u32,
    pub active_colors: Vec<ColorId>,
    /// Active colors beyond the available slots.
    pub excess: usize,
}

/// What a merge would change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeImpact {
    /// Impossible layers on which both colors are active.
    pub layers_affected: BTreeSet<u32>,
}

/// Proposal to fold `secondary_color` into `primary_color`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeSuggestion {
    /// The more used of the two colors.
    pub primary_color: ColorId,
    pub secondary_color: ColorId,
    /// Hex distance between the colors; `None` when either has no hex.
    pub similarity: Option<f64>,
    pub impact: MergeImpact,
}

impl MergeSuggestion {
    fn pair_key(&self) -> (ColorId, ColorId) {
        if self.primary_color <= self.secondary_color {
            (self.primary_color.clone(), self.secondary_color.clone())
        } else {
            (self.secondary_color.clone(), self.primary_color.clone())
        }
    }
}

/// A maximal run of consecutive impossible layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintViolation {
    pub start_layer: u32,
    pub end_layer: u32,
    pub max_colors_required: usize,
    pub available_slots: usize,
    pub layers: Vec<LayerDetail>,
    pub suggestions: Vec<MergeSuggestion>,
}

/// Outcome of [`ConstraintAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityReport {
    pub available_slots: usize,
    pub has_violations: bool,
    pub feasible_layers: usize,
    pub impossible_layers: usize,
    pub layers: Vec<LayerStatus>,
    pub violations: Vec<ConstraintViolation>,
    /// Suggestions across all ranges, one per unordered color pair.
    pub suggestions: Vec<MergeSuggestion>,
}

impl FeasibilityReport {
    pub fn is_feasible(&self) -> bool {
        !self.has_violations
    }
}

/// Checks whether a print fits into a number of slots.
///
/// # Example
///
/// ```
/// use swapforge_core::{ColorId, LayerCensus};
/// use swapforge_solver::ConstraintAnalyzer;
///
/// let mut census = LayerCensus::new();
/// for id in ["A", "B", "C"] {
///     census.insert(7, ColorId::from(id));
/// }
///
/// let report = ConstraintAnalyzer::new(2).unwrap().analyze(&census, &[]);
/// assert!(report.has_violations);
/// assert_eq!(report.violations[0].start_layer, 7);
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintAnalyzer {
    available_slots: usize,
    max_suggestions_per_range: usize,
    similarity_threshold: Option<f64>,
}

impl ConstraintAnalyzer {
    /// # Errors
    ///
    /// Returns `Configuration` when `available_slots` is zero.
    pub fn new(available_slots: usize) -> Result<Self> {
        if available_slots == 0 {
            return Err(SwapForgeError::Configuration(
                "at least one slot is required".to_string(),
            ));
        }
        Ok(Self {
            available_slots,
            max_suggestions_per_range: DEFAULT_MAX_SUGGESTIONS,
            similarity_threshold: None,
        })
    }

    /// Slot count and suggestion settings from an optimizer configuration.
    pub fn from_config(config: &OptimizerConfig) -> Result<Self> {
        config.validate()?;
        let mut analyzer = Self::new(config.total_slots())?
            .with_max_suggestions(config.constraints.max_suggestions_per_range);
        analyzer.similarity_threshold = config.constraints.similarity_threshold;
        Ok(analyzer)
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions_per_range = max;
        self
    }

    /// Only pairs whose hex distance is at most `threshold` are suggested.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    pub fn available_slots(&self) -> usize {
        self.available_slots
    }

    /// Feasibility of every layer present in the census, in layer order.
    pub fn classify_layers(&self, census: &LayerCensus) -> Vec<LayerStatus> {
        census
            .iter()
            .map(|(layer, active)| LayerStatus {
                layer,
                active: active.len(),
                feasible: active.len() <= self.available_slots,
            })
            .collect()
    }

    /// Full report for a census. `colors` supplies hex values and usage
    /// counts for ranking merge suggestions; ids missing from it still
    /// produce suggestions, ranked last.
    pub fn analyze(&self, census: &LayerCensus, colors: &[Color]) -> FeasibilityReport {
        let layers = self.classify_layers(census);
        let by_id: BTreeMap<&ColorId, &Color> = colors.iter().map(|c| (c.id(), c)).collect();

        let mut violations = Vec::new();
        let mut run: Vec<u32> = Vec::new();
        for status in layers.iter().filter(|s| !s.feasible) {
            if run.last().is_some_and(|&last| last + 1 != status.layer) {
                violations.push(self.violation(census, &run, &by_id));
                run.clear();
            }
            run.push(status.layer);
        }
        if !run.is_empty() {
            violations.push(self.violation(census, &run, &by_id));
        }

        let suggestions = deduplicate(violations.iter().flat_map(|v| v.suggestions.iter()));
        let impossible_layers = layers.iter().filter(|s| !s.feasible).count();

        FeasibilityReport {
            available_slots: self.available_slots,
            has_violations: !violations.is_empty(),
            feasible_layers: layers.len() - impossible_layers,
            impossible_layers,
            layers,
            violations,
            suggestions,
        }
    }

    /// [`ConstraintAnalyzer::analyze`] on a snapshot's census and colors.
    pub fn analyze_snapshot(&self, snapshot: &PrintSnapshot) -> FeasibilityReport {
        self.analyze(&snapshot.census, &snapshot.colors)
    }

    fn violation(
        &self,
        census: &LayerCensus,
        run: &[u32],
        by_id: &BTreeMap<&ColorId, &Color>,
    ) -> ConstraintViolation {
        let layers: Vec<LayerDetail> = run
            .iter()
            .map(|&layer| {
                let active = census.active(layer);
                LayerDetail {
                    layer,
                    active_colors: active.to_vec(),
                    excess: active.len().saturating_sub(self.available_slots),
                }
            })
            .collect();

        let start_layer = run.first().copied().unwrap_or_default();
        let end_layer = run.last().copied().unwrap_or_default();
        let max_colors_required = layers
            .iter()
            .map(|d| d.active_colors.len())
            .max()
            .unwrap_or(0);

        debug!(
            event = "violation_range",
            start_layer,
            end_layer,
            max_colors_required,
            available_slots = self.available_slots,
        );

        ConstraintViolation {
            start_layer,
            end_layer,
            max_colors_required,
            available_slots: self.available_slots,
            suggestions: self.suggestions_for(&layers, by_id),
            layers,
        }
    }

    /// Ranked merge candidates for one violation range.
    ///
    /// Pairs with both hex values come first, closest first; the rest follow.
    /// Remaining ties are broken by the ids.
    fn suggestions_for(
        &self,
        layers: &[LayerDetail],
        by_id: &BTreeMap<&ColorId, &Color>,
    ) -> Vec<MergeSuggestion> {
        let mut ids: Vec<&ColorId> = Vec::new();
        for detail in layers {
            for id in &detail.active_colors {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }

        let mut candidates = Vec::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let layers_affected: BTreeSet<u32> = layers
                    .iter()
                    .filter(|d| d.active_colors.contains(a) && d.active_colors.contains(b))
                    .map(|d| d.layer)
                    .collect();
                if layers_affected.is_empty() {
                    continue;
                }

                let (ca, cb) = (by_id.get(a), by_id.get(b));
                let similarity = match (ca.and_then(|c| c.hex()), cb.and_then(|c| c.hex())) {
                    (Some(x), Some(y)) => Some(x.distance(&y)),
                    _ => None,
                };
                if let Some(threshold) = self.similarity_threshold {
                    if !similarity.is_some_and(|d| d <= threshold) {
                        continue;
                    }
                }

                let usage = |id: &ColorId| by_id.get(id).map_or(0, |c| c.usage_count());
                let a_first = match usage(a).cmp(&usage(b)) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => a <= b,
                };
                let (primary_color, secondary_color) = if a_first {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                };

                candidates.push(MergeSuggestion {
                    primary_color,
                    secondary_color,
                    similarity,
                    impact: MergeImpact { layers_affected },
                });
            }
        }

        candidates.sort_by(|x, y| {
            rank_similarity(x.similarity, y.similarity)
                .then_with(|| x.primary_color.cmp(&y.primary_color))
                .then_with(|| x.secondary_color.cmp(&y.secondary_color))
        });
        candidates.truncate(self.max_suggestions_per_range);
        candidates
    }
}

fn rank_similarity(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One suggestion per unordered pair, keeping first-seen order and
/// unioning the affected layers of repeats.
fn deduplicate<'a>(suggestions: impl Iterator<Item = &'a MergeSuggestion>) -> Vec<MergeSuggestion> {
    let mut merged: Vec<MergeSuggestion> = Vec::new();
    let mut index: BTreeMap<(ColorId, ColorId), usize> = BTreeMap::new();

    for suggestion in suggestions {
        let key = suggestion.pair_key();
        match index.get(&key) {
            Some(&i) => merged[i]
                .impact
                .layers_affected
                .extend(suggestion.impact.layers_affected.iter().copied()),
            None => {
                index.insert(key, merged.len());
                merged.push(suggestion.clone());
            }
        }
    }
    merged
}
