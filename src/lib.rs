//! `tilemap` library crate.
//!
//! The binary (`tilemap`) is a thin wrapper around this library so that:
//!
//! - binning and classification are testable without spawning processes
//! - the same pipeline drives the CLI reports, JSON export, and the TUI
//! - an external renderer can consume `MapFile` exports directly

pub mod app;
pub mod bins;
pub mod classify;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod geo;
pub mod io;
pub mod legend;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
