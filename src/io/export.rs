//! Read/write map JSON files.
//!
//! Map JSON is the "portable" representation of a classified tile map:
//! - binning mode + bins (the chart's data classes)
//! - legend captions and box layout
//! - the classified records (color + geometry key per region)
//!
//! An external chart renderer can draw the map from this file alone.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Bin, BinningMode, ClassifiedRecord};
use crate::error::AppError;
use crate::legend::{LegendLayout, LegendSpec};

/// A saved map file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFile {
    pub tool: String,
    pub mode: BinningMode,
    pub bins: Vec<Bin>,
    pub legend: LegendSpec,
    pub legend_layout: LegendLayout,
    pub data: Vec<ClassifiedRecord>,
}

impl MapFile {
    pub fn new(mode: BinningMode, legend: &LegendSpec, data: &[ClassifiedRecord]) -> Self {
        Self {
            tool: "tilemap".to_string(),
            mode,
            bins: legend.bins.clone(),
            legend: legend.clone(),
            legend_layout: LegendLayout::from_spec(legend),
            data: data.to_vec(),
        }
    }
}

/// Write a map JSON file.
pub fn write_map_json(path: &Path, map: &MapFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create map JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, map)
        .map_err(|e| AppError::new(2, format!("Failed to write map JSON: {e}")))?;

    log::info!("wrote {} classified region(s) to {}", map.data.len(), path.display());
    Ok(())
}

/// Read a map JSON file.
pub fn read_map_json(path: &Path) -> Result<MapFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open map JSON '{}': {e}", path.display())))?;
    let map: MapFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid map JSON: {e}")))?;
    Ok(map)
}
