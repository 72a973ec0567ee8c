//! Per-layer census builders.

use swapforge_core::{ColorId, LayerCensus};

/// Builds a census from `(layer, active ids)` rows.
pub fn census(rows: &[(u32, &[&str])]) -> LayerCensus {
    rows.iter()
        .map(|&(layer, ids)| (layer, ids.iter().map(|&id| ColorId::from(id)).collect()))
        .collect()
}

/// Every layer of `first..=last` with the same active ids.
pub fn uniform_census(first: u32, last: u32, ids: &[&str]) -> LayerCensus {
    (first..=last)
        .map(|layer| (layer, ids.iter().map(|&id| ColorId::from(id)).collect()))
        .collect()
}
