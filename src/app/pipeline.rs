//! Shared "map pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load records -> compute bins -> classify -> describe legend
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::classify::classify;
use crate::data::generate_sample;
use crate::domain::{Bin, ClassifiedRecord, InputSource, MapConfig};
use crate::error::AppError;
use crate::geo::StateTiles;
use crate::io::export::MapFile;
use crate::io::ingest::{IngestedData, load_records};
use crate::legend::{Clock, LegendSpec, SystemClock};

/// All computed outputs of a single map run.
#[derive(Debug, Clone)]
pub struct MapRun {
    pub ingest: IngestedData,
    pub bins: Vec<Bin>,
    pub classified: Vec<ClassifiedRecord>,
    pub legend: LegendSpec,
}

impl MapRun {
    pub fn to_map_file(&self, config: &MapConfig) -> MapFile {
        MapFile::new(config.mode, &self.legend, &self.classified)
    }
}

/// Execute the full pipeline against the local date.
pub fn run_map(config: &MapConfig) -> Result<MapRun, AppError> {
    run_map_with_clock(config, &SystemClock)
}

/// Execute the full pipeline with an explicit clock for the legend caption.
pub fn run_map_with_clock(config: &MapConfig, clock: &dyn Clock) -> Result<MapRun, AppError> {
    // 1) Load records.
    let ingest = load_input(config)?;

    // 2) Bin, classify, and describe the legend.
    let bins = config.mode.compute(&ingest.records, &config.palette);
    if bins.is_empty() {
        log::warn!("all display values are 0; the map has no color classes");
    }
    let classified = classify(&ingest.records, &bins, &StateTiles);
    let legend = LegendSpec::build(config.mode, &bins, clock);

    Ok(MapRun {
        ingest,
        bins,
        classified,
        legend,
    })
}

fn load_input(config: &MapConfig) -> Result<IngestedData, AppError> {
    match &config.input {
        InputSource::File(path) => load_records(path, config.mode),
        InputSource::Demo { seed } => IngestedData::from_records(
            generate_sample(*seed, config.mode),
            format!("synthetic sample (seed {seed})"),
        ),
    }
}
