//! Terminal tile map.
//!
//! This is intentionally "dumb" (fixed grid, fixed glyphs), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each state tile spans three lines: abbreviation, display value, and a shade
//! bar whose density follows the bin the value falls into.

use std::collections::HashMap;

use crate::classify::bin_index_for_value;
use crate::domain::{Bin, ClassifiedRecord};
use crate::geo::states::{GRID_COLS, GRID_ROWS, StateTiles};
use crate::report::format_thousands;

/// Shades from lightest to darkest bin.
const SHADES: [char; 4] = ['░', '▒', '▓', '█'];

/// Glyph for tiles that match no bin.
const UNCLASSIFIED: char = '·';

/// Glyph for bin `rank` out of `bin_count`, spread over the shade ramp.
pub fn shade_glyph(rank: Option<usize>, bin_count: usize) -> char {
    let Some(rank) = rank else {
        return UNCLASSIFIED;
    };
    let top = SHADES.len() - 1;
    if bin_count <= 1 {
        return SHADES[top];
    }
    let idx = (rank.min(bin_count - 1) * top + (bin_count - 1) / 2) / (bin_count - 1);
    SHADES[idx.min(top)]
}

/// Render classified records on the state tile grid.
///
/// Records whose name is not a known state are listed after the grid.
pub fn render_tile_map(records: &[ClassifiedRecord], bins: &[Bin], tile_width: usize) -> String {
    let w = tile_width.max(4);
    let tiles = StateTiles;

    let mut by_cell: HashMap<(usize, usize), &ClassifiedRecord> = HashMap::new();
    let mut off_grid = Vec::new();
    for rec in records {
        match rec.record.key().and_then(|k| tiles.get(k)) {
            Some(tile) => {
                by_cell.insert((tile.row, tile.col), rec);
            }
            None => off_grid.push(rec),
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Tile map: regions={} | classes={}\n",
        records.len(),
        bins.len()
    ));

    for row in 0..GRID_ROWS {
        let mut lines = [String::new(), String::new(), String::new()];
        for col in 0..GRID_COLS {
            let cell = match by_cell.get(&(row, col)) {
                Some(rec) => tile_cell(rec, bins, w),
                None => [" ".repeat(w), " ".repeat(w), " ".repeat(w)],
            };
            for (line, part) in lines.iter_mut().zip(cell) {
                line.push_str(&part);
                line.push(' ');
            }
        }
        for line in lines {
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    if !off_grid.is_empty() {
        let names: Vec<&str> = off_grid.iter().filter_map(|r| r.record.key()).collect();
        out.push_str(&format!("Not on grid: {}\n", names.join(", ")));
    }

    out
}

fn tile_cell(rec: &ClassifiedRecord, bins: &[Bin], w: usize) -> [String; 3] {
    let rank = bin_index_for_value(rec.record.display_value, bins);
    let glyph = shade_glyph(rank, bins.len());
    [
        fit(rec.record.key().unwrap_or(""), w),
        fit(&format_thousands(rec.record.display_value), w),
        glyph.to_string().repeat(w),
    ]
}

fn fit(s: &str, w: usize) -> String {
    let truncated: String = s.chars().take(w).collect();
    format!("{truncated:<w$}")
}
