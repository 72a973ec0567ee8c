//! SwapForge Core - data model for filament slot planning
//!
//! This crate provides the fundamental types shared by the planning engine:
//! - `Color`: an immutable filament usage over a set of print layers
//! - `Slot`: a physical material position holding one or more colors
//! - `LayerRange` and range merging for usage intervals
//! - `LayerCensus`, `ToolChange` and `PrintSnapshot` for whole-print state
//! - `SwapForgeError` for fatal failures

pub mod domain;
pub mod error;

pub use domain::{
    merge_ranges, Color, ColorId, ColorParseError, ColorRecord, FilamentEstimate, HexColor,
    LayerCensus, LayerRange, PrintSnapshot, Slot, SlotId, ToolChange,
};
pub use error::{Result, SwapForgeError};
