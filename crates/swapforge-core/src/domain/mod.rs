//! Domain model for filament slot planning
//!
//! - `Color`: immutable filament usage across layers
//! - `Slot`: mutable container of colors with a permanence flag
//! - `LayerRange`: inclusive layer interval with sort-and-sweep merging
//! - `LayerCensus` / `ToolChange`: per-layer activity from the parser
//! - `PrintSnapshot`: versioned, owned state of a whole print

mod census;
mod color;
mod hex;
mod range;
mod slot;
mod snapshot;

pub use census::{LayerCensus, ToolChange};
pub use color::{Color, ColorId, ColorRecord};
pub use hex::{ColorParseError, HexColor};
pub use range::{merge_ranges, LayerRange};
pub use slot::{Slot, SlotId};
pub use snapshot::{FilamentEstimate, PrintSnapshot};

#[cfg(test)]
mod tests;
