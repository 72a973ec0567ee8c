//! PrintSnapshot - the owned state of a whole print.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use super::census::{LayerCensus, ToolChange};
use super::color::{Color, ColorId};
use super::range::LayerRange;

/// Estimated filament consumption of one color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilamentEstimate {
    /// Extruded length in millimetres.
    pub length_mm: f64,
    /// Weight in grams.
    pub weight_g: f64,
}

impl FilamentEstimate {
    pub fn new(length_mm: f64, weight_g: f64) -> Self {
        Self {
            length_mm,
            weight_g,
        }
    }
}

impl Add for FilamentEstimate {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            length_mm: self.length_mm + other.length_mm,
            weight_g: self.weight_g + other.weight_g,
        }
    }
}

impl AddAssign for FilamentEstimate {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Everything the planner knows about a parsed print.
///
/// Snapshots are values: transformations build a new snapshot with a higher
/// `version` and leave the original untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintSnapshot {
    pub version: u64,
    pub total_layers: u32,
    pub colors: Vec<Color>,
    pub tool_changes: Vec<ToolChange>,
    pub census: LayerCensus,
    pub usage_ranges: BTreeMap<ColorId, Vec<LayerRange>>,
    pub filament_estimates: BTreeMap<ColorId, FilamentEstimate>,
}

impl PrintSnapshot {
    /// Builds a snapshot whose census and usage ranges are derived from
    /// the colors themselves.
    pub fn from_colors(colors: Vec<Color>) -> Self {
        let total_layers = colors.iter().map(Color::total_layers).max().unwrap_or(0);
        let census = LayerCensus::from_colors(&colors);
        let usage_ranges = colors
            .iter()
            .map(|c| (c.id().clone(), c.usage_ranges()))
            .collect();

        Self {
            version: 0,
            total_layers,
            colors,
            tool_changes: Vec::new(),
            census,
            usage_ranges,
            filament_estimates: BTreeMap::new(),
        }
    }

    pub fn with_tool_changes(mut self, tool_changes: Vec<ToolChange>) -> Self {
        self.tool_changes = tool_changes;
        self
    }

    pub fn with_census(mut self, census: LayerCensus) -> Self {
        self.census = census;
        self
    }

    pub fn with_estimate(mut self, id: impl Into<ColorId>, estimate: FilamentEstimate) -> Self {
        self.filament_estimates.insert(id.into(), estimate);
        self
    }

    pub fn color(&self, id: &ColorId) -> Option<&Color> {
        self.colors.iter().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: &ColorId) -> bool {
        self.color(id).is_some()
    }
}
