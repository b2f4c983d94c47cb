//! Numeric helpers shared by binning and formatting.

pub mod round;

pub use round::*;
