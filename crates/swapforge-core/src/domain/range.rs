//! Inclusive layer intervals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An inclusive span of layers `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerRange {
    pub start: u32,
    pub end: u32,
}

impl LayerRange {
    /// Creates a range, swapping the bounds if given in reverse.
    pub fn new(start: u32, end: u32) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    pub fn single(layer: u32) -> Self {
        Self {
            start: layer,
            end: layer,
        }
    }

    /// Number of layers covered.
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Never true: a range always covers at least one layer.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, layer: u32) -> bool {
        self.start <= layer && layer <= self.end
    }

    pub fn intersects(&self, other: &LayerRange) -> bool {
        !(self.end < other.start || other.end < self.start)
    }

    pub fn layers(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl fmt::Display for LayerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Merges overlapping or adjacent ranges with a sort-and-sweep.
///
/// Two ranges are adjacent when the gap between them is at most one layer
/// (`next.start <= current.end + 1`). The output is sorted by start and
/// pairwise separated by at least one unused layer, so merging it again
/// returns it unchanged.
///
/// # Examples
///
/// ```
/// use swapforge_core::{merge_ranges, LayerRange};
///
/// let merged = merge_ranges(vec![
///     LayerRange::new(10, 20),
///     LayerRange::new(0, 5),
///     LayerRange::new(21, 30),
/// ]);
/// assert_eq!(merged, vec![LayerRange::new(0, 5), LayerRange::new(10, 30)]);
/// ```
pub fn merge_ranges(mut ranges: Vec<LayerRange>) -> Vec<LayerRange> {
    ranges.sort_unstable();

    let mut merged: Vec<LayerRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(current) if range.start <= current.end.saturating_add(1) => {
                current.end = current.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Collapses a sorted set of layers into maximal consecutive ranges.
pub(crate) fn ranges_from_layers<'a>(layers: impl IntoIterator<Item = &'a u32>) -> Vec<LayerRange> {
    let mut ranges: Vec<LayerRange> = Vec::new();
    for &layer in layers {
        match ranges.last_mut() {
            Some(current) if layer == current.end.saturating_add(1) => current.end = layer,
            Some(current) if layer <= current.end => {}
            _ => ranges.push(LayerRange::single(layer)),
        }
    }
    ranges
}
