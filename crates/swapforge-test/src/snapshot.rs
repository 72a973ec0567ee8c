//! Print snapshots for merge tests.

use swapforge_core::{FilamentEstimate, PrintSnapshot, ToolChange};

use crate::colors::{hex, hex_color, sparse_color};

/// Three colors with tool changes and estimates.
///
/// - `A` red, layers 0..=9 and 20..=29, partial on layer 5
/// - `B` dark red, layers 10..=19
/// - `C` blue, layers 0..=29
///
/// Tool changes: A -> B at 10, B -> A at 20, A -> C at 25.
/// Estimates exist for `A` and `B` only.
pub fn three_color_snapshot() -> PrintSnapshot {
    let a_layers: Vec<u32> = (0..10).chain(20..30).collect();
    let a = sparse_color("A", &a_layers)
        .with_hex(hex("#FF0000"))
        .with_name("Red")
        .with_partial_layers([5]);
    let b = hex_color("B", 10, 19, "#CC0000").with_name("Dark Red");
    let c = hex_color("C", 0, 29, "#0000FF").with_name("Blue");

    PrintSnapshot::from_colors(vec![a, b, c])
        .with_tool_changes(vec![
            ToolChange::new(10, "A", "B"),
            ToolChange::new(20, "B", "A"),
            ToolChange::new(25, "A", "C"),
        ])
        .with_estimate("A", FilamentEstimate::new(1000.0, 3.0))
        .with_estimate("B", FilamentEstimate::new(500.0, 1.5))
}
