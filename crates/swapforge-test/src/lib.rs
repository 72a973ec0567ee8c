//! Shared test fixtures for SwapForge crates.
//!
//! - [`colors`] - color builders from layer ranges
//! - [`census`] - per-layer census builders
//! - [`snapshot`] - small print snapshots for merge tests
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! swapforge-test = { workspace = true }
//! ```
//!
//! ```
//! use swapforge_test::colors::colors_from_ranges;
//!
//! let colors = colors_from_ranges(&[(0, 50), (51, 100)]);
//! assert_eq!(colors[1].id().as_str(), "T1");
//! ```

pub mod census;
pub mod colors;
pub mod snapshot;

pub use colors::{color, colors_from_ranges};
