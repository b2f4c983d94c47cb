//! Region name → geometry key lookup.
//!
//! The classifier does not know how shapes are drawn; it only asks a
//! `GeometryLookup` for an opaque key the renderer understands. Missing keys are
//! not errors: the renderer skips those regions.

use std::collections::HashMap;

pub mod states;

pub use states::{STATE_TILES, StateTile, StateTiles};

pub trait GeometryLookup {
    fn geometry_key(&self, name: &str) -> Option<String>;
}

impl GeometryLookup for HashMap<String, String> {
    fn geometry_key(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<F> GeometryLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn geometry_key(&self, name: &str) -> Option<String> {
        self(name)
    }
}
