//! Input/output helpers.
//!
//! - CSV/JSON ingest + validation (`ingest`)
//! - map JSON read/write (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
