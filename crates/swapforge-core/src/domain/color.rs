//! Color - an immutable filament usage over print layers.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::hex::HexColor;
use super::range::{ranges_from_layers, LayerRange};
use crate::error::{Result, SwapForgeError};

/// Stable identifier of a color, typically the tool index (`"T0"`, `"T1"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorId(String);

impl ColorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ColorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A filament usage: the set of layers in which one color is printed.
///
/// Colors are built once and never mutated. Anything that changes the layer
/// set (a merge, metadata enrichment) produces a new `Color`.
///
/// `first_layer` and `last_layer` are derived from `layers_used`, so
/// `first_layer <= last_layer` always holds. `partial_layers` is kept a
/// subset of `layers_used`.
///
/// # Examples
///
/// ```
/// use swapforge_core::Color;
///
/// let base = Color::from_range("T0", 0, 49, 200).unwrap().with_name("Black");
/// assert_eq!(base.first_layer(), 0);
/// assert_eq!(base.last_layer(), 49);
/// assert_eq!(base.usage_percentage(), 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRecord", into = "ColorRecord")]
pub struct Color {
    id: ColorId,
    name: String,
    hex: Option<HexColor>,
    first_layer: u32,
    last_layer: u32,
    layers_used: BTreeSet<u32>,
    partial_layers: BTreeSet<u32>,
    total_layers: u32,
}

impl Color {
    /// Creates a color from an explicit set of used layers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidColor` when `layers` is empty.
    pub fn from_layers(
        id: impl Into<ColorId>,
        layers: impl IntoIterator<Item = u32>,
        total_layers: u32,
    ) -> Result<Self> {
        let id = id.into();
        let layers_used: BTreeSet<u32> = layers.into_iter().collect();
        let (Some(&first_layer), Some(&last_layer)) = (layers_used.first(), layers_used.last())
        else {
            return Err(SwapForgeError::InvalidColor(format!(
                "color {id} has no used layers"
            )));
        };

        Ok(Self {
            name: id.to_string(),
            id,
            hex: None,
            first_layer,
            last_layer,
            layers_used,
            partial_layers: BTreeSet::new(),
            total_layers: total_layers.max(last_layer.saturating_add(1)),
        })
    }

    /// Creates a color used on every layer of `first..=last`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidColor` when `last < first`.
    pub fn from_range(
        id: impl Into<ColorId>,
        first: u32,
        last: u32,
        total_layers: u32,
    ) -> Result<Self> {
        let id = id.into();
        if last < first {
            return Err(SwapForgeError::InvalidColor(format!(
                "color {id} ends at layer {last} before it starts at layer {first}"
            )));
        }
        Self::from_layers(id, first..=last, total_layers)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_hex(mut self, hex: HexColor) -> Self {
        self.hex = Some(hex);
        self
    }

    /// Attaches a hex color parsed from `#RRGGBB`.
    pub fn with_hex_str(self, hex: &str) -> Result<Self> {
        let parsed = HexColor::parse(hex).map_err(|e| {
            SwapForgeError::InvalidColor(format!("color {}: {hex:?}: {e}", self.id))
        })?;
        Ok(self.with_hex(parsed))
    }

    /// Marks layers where this color is present but not dominant.
    ///
    /// Layers outside `layers_used` are ignored.
    pub fn with_partial_layers(mut self, layers: impl IntoIterator<Item = u32>) -> Self {
        self.partial_layers = layers
            .into_iter()
            .filter(|layer| self.layers_used.contains(layer))
            .collect();
        self
    }

    pub fn id(&self) -> &ColorId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hex(&self) -> Option<HexColor> {
        self.hex
    }

    pub fn first_layer(&self) -> u32 {
        self.first_layer
    }

    pub fn last_layer(&self) -> u32 {
        self.last_layer
    }

    pub fn layers_used(&self) -> &BTreeSet<u32> {
        &self.layers_used
    }

    pub fn partial_layers(&self) -> &BTreeSet<u32> {
        &self.partial_layers
    }

    pub fn total_layers(&self) -> u32 {
        self.total_layers
    }

    /// Number of layers this color is printed on.
    pub fn usage_count(&self) -> usize {
        self.layers_used.len()
    }

    /// Share of the print's layers using this color, in percent.
    pub fn usage_percentage(&self) -> f64 {
        if self.total_layers == 0 {
            return 0.0;
        }
        self.layers_used.len() as f64 / f64::from(self.total_layers) * 100.0
    }

    /// The inclusive `[first_layer, last_layer]` span.
    pub fn span(&self) -> LayerRange {
        LayerRange::new(self.first_layer, self.last_layer)
    }

    /// Maximal runs of consecutive used layers.
    pub fn usage_ranges(&self) -> Vec<LayerRange> {
        ranges_from_layers(&self.layers_used)
    }

    /// True when the layer spans of both colors intersect.
    ///
    /// Spans that touch on a shared layer overlap.
    pub fn overlaps(&self, other: &Color) -> bool {
        !(self.last_layer < other.first_layer || other.last_layer < self.first_layer)
    }

    /// True when both colors are printed on at least one common layer.
    ///
    /// Stricter than [`Color::overlaps`] for colors with gaps in their usage.
    pub fn shares_layers(&self, other: &Color) -> bool {
        self.overlaps(other) && !self.layers_used.is_disjoint(&other.layers_used)
    }
}

/// Wire shape of a color as produced by the print parser.
///
/// When `layers_used` is omitted every layer of `first_layer..=last_layer`
/// counts as used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ColorRecord {
    pub id: ColorId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hex: Option<String>,
    pub first_layer: u32,
    pub last_layer: u32,
    #[serde(default)]
    pub layers_used: Option<Vec<u32>>,
    #[serde(default)]
    pub partial_layers: Vec<u32>,
    #[serde(default)]
    pub total_layers: u32,
}

impl TryFrom<ColorRecord> for Color {
    type Error = SwapForgeError;

    fn try_from(record: ColorRecord) -> Result<Self> {
        let mut color = match record.layers_used {
            Some(layers) => Color::from_layers(record.id, layers, record.total_layers)?,
            None => Color::from_range(
                record.id,
                record.first_layer,
                record.last_layer,
                record.total_layers,
            )?,
        };
        if let Some(name) = record.name {
            color = color.with_name(name);
        }
        if let Some(hex) = record.hex.as_deref() {
            color = color.with_hex_str(hex)?;
        }
        Ok(color.with_partial_layers(record.partial_layers))
    }
}

impl From<Color> for ColorRecord {
    fn from(color: Color) -> Self {
        ColorRecord {
            id: color.id,
            name: Some(color.name),
            hex: color.hex.map(|h| h.to_string()),
            first_layer: color.first_layer,
            last_layer: color.last_layer,
            layers_used: Some(color.layers_used.into_iter().collect()),
            partial_layers: color.partial_layers.into_iter().collect(),
            total_layers: color.total_layers,
        }
    }
}
