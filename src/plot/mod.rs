//! Terminal rendering of the classified tile map.

pub mod tiles;

pub use tiles::*;
