//! Value binning for map color classes.
//!
//! Responsibilities:
//!
//! - find the maximum display value of a dataset
//! - split it into palette-sized bins (absolute or per-capita)
//! - select the strategy from a `BinningMode`

pub mod calculator;
pub mod strategy;

pub use calculator::*;
