//! Manual swaps derived from shared slot contents.

use serde::Serialize;
use swapforge_core::{Color, ColorId, LayerRange, SlotId};

/// Layers of slack on each side of the swap layer.
const TIMING_SLACK: u32 = 10;

/// Free layers between two colors from which a swap is considered easy.
const WIDE_GAP: u32 = 20;

/// How comfortable a swap is to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapConfidence {
    /// The colors overlap or touch; the swap must happen exactly at the boundary.
    Low,
    /// A short gap separates the colors.
    Medium,
    /// A wide gap separates the colors.
    High,
}

impl SwapConfidence {
    fn from_gap(gap: u32) -> Self {
        if gap >= WIDE_GAP {
            Self::High
        } else if gap >= 1 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn score(self) -> f64 {
        match self {
            Self::High => 0.9,
            Self::Medium => 0.7,
            Self::Low => 0.4,
        }
    }
}

/// Range of layers at which a swap can be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingOptions {
    pub earliest: u32,
    pub latest: u32,
    pub optimal: u32,
}

/// A pause to unload one color and load the next into a shared slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualSwap {
    pub slot: SlotId,
    pub from_color: ColorId,
    pub to_color: ColorId,
    pub at_layer: u32,
    /// Layers between the end of `from_color` and the start of `to_color`.
    pub pause_window: LayerRange,
    pub timing: TimingOptions,
    pub confidence: SwapConfidence,
}

impl ManualSwap {
    /// Derives the swap from `from` to `to`, which follow each other in `slot`.
    ///
    /// When free layers separate the colors the swap sits in the middle of the
    /// gap. Otherwise it sits on the first layer of `to`. The timing window
    /// spans 10 layers on either side, bounded by the first layer of `from`
    /// and the last layer of `to`.
    pub fn between(slot: SlotId, from: &Color, to: &Color) -> Self {
        let after = from.last_layer();
        let before = to.first_layer();
        let gap = before.saturating_sub(after).saturating_sub(1);

        let (at_layer, pause_window) = if gap >= 1 {
            (
                after + (before - after) / 2,
                LayerRange::new(after + 1, before),
            )
        } else {
            (before, LayerRange::single(before))
        };

        let timing = TimingOptions {
            earliest: at_layer.saturating_sub(TIMING_SLACK).max(from.first_layer()),
            latest: at_layer.saturating_add(TIMING_SLACK).min(to.last_layer()),
            optimal: at_layer,
        };

        Self {
            slot,
            from_color: from.id().clone(),
            to_color: to.id().clone(),
            at_layer,
            pause_window,
            timing,
            confidence: SwapConfidence::from_gap(gap),
        }
    }
}

/// Swaps for one slot's colors, in first-layer order (ties by id).
pub(crate) fn swaps_for_slot(slot: SlotId, colors: &[Color]) -> Vec<ManualSwap> {
    let mut ordered: Vec<&Color> = colors.iter().collect();
    ordered.sort_by(|a, b| {
        a.first_layer()
            .cmp(&b.first_layer())
            .then_with(|| a.id().cmp(b.id()))
    });
    ordered
        .windows(2)
        .map(|pair| ManualSwap::between(slot, pair[0], pair[1]))
        .collect()
}
