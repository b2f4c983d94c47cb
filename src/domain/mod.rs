//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input records (`RegionRecord`) and the resolved run config (`MapConfig`)
//! - binning inputs/outputs (`Palette`, `BinningMode`, `Bin`)
//! - render-ready output (`ClassifiedRecord`)

pub mod types;

pub use types::*;
