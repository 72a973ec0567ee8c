//! Color builders.
//!
//! Fixtures panic on invalid input; they are only used from tests.

use swapforge_core::{Color, HexColor};

/// Total layer count used by every fixture color.
pub const FIXTURE_TOTAL_LAYERS: u32 = 200;

/// A color used on every layer of `first..=last`.
pub fn color(id: &str, first: u32, last: u32) -> Color {
    Color::from_range(id, first, last, FIXTURE_TOTAL_LAYERS)
        .unwrap_or_else(|e| panic!("invalid fixture color {id}: {e}"))
}

/// Parses a `#RRGGBB` fixture value.
pub fn hex(value: &str) -> HexColor {
    HexColor::parse(value).unwrap_or_else(|e| panic!("invalid fixture hex {value}: {e}"))
}

/// A color with a hex value.
pub fn hex_color(id: &str, first: u32, last: u32, value: &str) -> Color {
    color(id, first, last).with_hex(hex(value))
}

/// A color used on an explicit, possibly non-contiguous, set of layers.
pub fn sparse_color(id: &str, layers: &[u32]) -> Color {
    Color::from_layers(id, layers.iter().copied(), FIXTURE_TOTAL_LAYERS)
        .unwrap_or_else(|e| panic!("invalid fixture color {id}: {e}"))
}

/// Colors named `T0`, `T1`, ... in range order.
pub fn colors_from_ranges(ranges: &[(u32, u32)]) -> Vec<Color> {
    ranges
        .iter()
        .enumerate()
        .map(|(i, &(first, last))| color(&format!("T{i}"), first, last))
        .collect()
}

/// `count` back-to-back colors of `length` layers each, starting at layer 0.
pub fn sequential_colors(count: u32, length: u32) -> Vec<Color> {
    (0..count)
        .map(|i| color(&format!("T{i}"), i * length, (i + 1) * length - 1))
        .collect()
}

/// `count` colors that all span `first..=last`.
pub fn overlapping_colors(count: usize, first: u32, last: u32) -> Vec<Color> {
    (0..count)
        .map(|i| color(&format!("T{i}"), first, last))
        .collect()
}
