//! Reporting utilities: formatted terminal output for a tile map run.

pub mod format;

pub use format::*;
