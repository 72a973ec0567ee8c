//! Per-layer color activity and the tool-change sequence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::color::{Color, ColorId};

/// Which colors are active on each layer.
///
/// Layers absent from the census have no active colors. Ids within a layer
/// are unique and keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerCensus {
    layers: BTreeMap<u32, Vec<ColorId>>,
}

impl LayerCensus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a census from each color's `layers_used`.
    ///
    /// Within a layer, colors appear in the order they are given.
    pub fn from_colors(colors: &[Color]) -> Self {
        let mut census = Self::new();
        for color in colors {
            for &layer in color.layers_used() {
                census.insert(layer, color.id().clone());
            }
        }
        census
    }

    /// Records `id` as active on `layer`; duplicates are ignored.
    pub fn insert(&mut self, layer: u32, id: ColorId) {
        let active = self.layers.entry(layer).or_default();
        if !active.contains(&id) {
            active.push(id);
        }
    }

    /// Replaces the active list of a layer, dropping repeated ids.
    pub fn set_layer(&mut self, layer: u32, ids: impl IntoIterator<Item = ColorId>) {
        let mut active: Vec<ColorId> = Vec::new();
        for id in ids {
            if !active.contains(&id) {
                active.push(id);
            }
        }
        self.layers.insert(layer, active);
    }

    /// Colors active on `layer`, empty when the layer is unknown.
    pub fn active(&self, layer: u32) -> &[ColorId] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[ColorId])> {
        self.layers.iter().map(|(&layer, ids)| (layer, ids.as_slice()))
    }

    /// Number of layers recorded.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Largest number of colors active on a single layer.
    pub fn max_active(&self) -> usize {
        self.layers.values().map(Vec::len).max().unwrap_or(0)
    }
}

impl FromIterator<(u32, Vec<ColorId>)> for LayerCensus {
    fn from_iter<I: IntoIterator<Item = (u32, Vec<ColorId>)>>(iter: I) -> Self {
        let mut census = Self::new();
        for (layer, ids) in iter {
            census.set_layer(layer, ids);
        }
        census
    }
}

/// A tool change emitted by the slicer: `from_tool` is unloaded and
/// `to_tool` loaded at `layer`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolChange {
    pub layer: u32,
    pub from_tool: ColorId,
    pub to_tool: ColorId,
}

impl ToolChange {
    pub fn new(layer: u32, from_tool: impl Into<ColorId>, to_tool: impl Into<ColorId>) -> Self {
        Self {
            layer,
            from_tool: from_tool.into(),
            to_tool: to_tool.into(),
        }
    }
}
