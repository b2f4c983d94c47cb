//! Built-in US state tile grid.
//!
//! Each state (plus DC and Puerto Rico) occupies one square on a 8x12 grid that
//! roughly follows its geographic position. Populations are 2020 census counts
//! in thousands, used by the synthetic dataset to derive per-capita rates.

use super::GeometryLookup;

/// Side length of one tile in geometry units.
pub const TILE_SIZE: u32 = 10;

pub const GRID_ROWS: usize = 8;
pub const GRID_COLS: usize = 12;

/// One square on the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTile {
    pub abbr: &'static str,
    pub name: &'static str,
    pub row: usize,
    pub col: usize,
    pub population_k: u32,
}

impl StateTile {
    /// SVG path of the tile square.
    pub fn path(&self) -> String {
        let x = self.col as u32 * TILE_SIZE;
        let y = self.row as u32 * TILE_SIZE;
        format!("M{x},{y}h{s}v{s}h-{s}Z", s = TILE_SIZE)
    }
}

const fn tile(abbr: &'static str, name: &'static str, row: usize, col: usize, population_k: u32) -> StateTile {
    StateTile {
        abbr,
        name,
        row,
        col,
        population_k,
    }
}

pub const STATE_TILES: [StateTile; 52] = [
    tile("AK", "Alaska", 0, 0, 733),
    tile("ME", "Maine", 0, 11, 1_362),
    tile("VT", "Vermont", 1, 10, 643),
    tile("NH", "New Hampshire", 1, 11, 1_377),
    tile("WA", "Washington", 2, 1, 7_705),
    tile("ID", "Idaho", 2, 2, 1_839),
    tile("MT", "Montana", 2, 3, 1_084),
    tile("ND", "North Dakota", 2, 4, 779),
    tile("MN", "Minnesota", 2, 5, 5_706),
    tile("IL", "Illinois", 2, 6, 12_812),
    tile("WI", "Wisconsin", 2, 7, 5_893),
    tile("MI", "Michigan", 2, 8, 10_077),
    tile("NY", "New York", 2, 9, 20_201),
    tile("RI", "Rhode Island", 2, 10, 1_097),
    tile("MA", "Massachusetts", 2, 11, 7_029),
    tile("OR", "Oregon", 3, 1, 4_237),
    tile("NV", "Nevada", 3, 2, 3_104),
    tile("WY", "Wyoming", 3, 3, 577),
    tile("SD", "South Dakota", 3, 4, 887),
    tile("IA", "Iowa", 3, 5, 3_190),
    tile("IN", "Indiana", 3, 6, 6_785),
    tile("OH", "Ohio", 3, 7, 11_799),
    tile("PA", "Pennsylvania", 3, 8, 13_002),
    tile("NJ", "New Jersey", 3, 9, 9_289),
    tile("CT", "Connecticut", 3, 10, 3_606),
    tile("CA", "California", 4, 1, 39_538),
    tile("UT", "Utah", 4, 2, 3_272),
    tile("CO", "Colorado", 4, 3, 5_774),
    tile("NE", "Nebraska", 4, 4, 1_962),
    tile("MO", "Missouri", 4, 5, 6_154),
    tile("KY", "Kentucky", 4, 6, 4_506),
    tile("WV", "West Virginia", 4, 7, 1_794),
    tile("VA", "Virginia", 4, 8, 8_631),
    tile("MD", "Maryland", 4, 9, 6_177),
    tile("DE", "Delaware", 4, 10, 990),
    tile("AZ", "Arizona", 5, 2, 7_152),
    tile("NM", "New Mexico", 5, 3, 2_118),
    tile("KS", "Kansas", 5, 4, 2_938),
    tile("AR", "Arkansas", 5, 5, 3_011),
    tile("TN", "Tennessee", 5, 6, 6_911),
    tile("NC", "North Carolina", 5, 7, 10_439),
    tile("SC", "South Carolina", 5, 8, 5_119),
    tile("DC", "District of Columbia", 5, 9, 690),
    tile("OK", "Oklahoma", 6, 4, 3_959),
    tile("LA", "Louisiana", 6, 5, 4_658),
    tile("MS", "Mississippi", 6, 6, 2_961),
    tile("AL", "Alabama", 6, 7, 5_024),
    tile("GA", "Georgia", 6, 8, 10_712),
    tile("HI", "Hawaii", 7, 0, 1_455),
    tile("TX", "Texas", 7, 4, 29_146),
    tile("FL", "Florida", 7, 9, 21_538),
    tile("PR", "Puerto Rico", 7, 11, 3_286),
];

/// Lookup over the built-in state grid, keyed by postal abbreviation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateTiles;

impl StateTiles {
    pub fn all(&self) -> &'static [StateTile] {
        &STATE_TILES
    }

    /// Exact, case-sensitive match on the postal abbreviation.
    pub fn get(&self, abbr: &str) -> Option<&'static StateTile> {
        STATE_TILES.iter().find(|t| t.abbr == abbr)
    }
}

impl GeometryLookup for StateTiles {
    fn geometry_key(&self, name: &str) -> Option<String> {
        self.get(name).map(StateTile::path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn grid_cells_are_unique_and_in_bounds() {
        let mut seen = HashSet::new();
        for t in &STATE_TILES {
            assert!(t.row < GRID_ROWS && t.col < GRID_COLS, "{} out of bounds", t.abbr);
            assert!(seen.insert((t.row, t.col)), "{} overlaps another tile", t.abbr);
        }
        let abbrs: HashSet<_> = STATE_TILES.iter().map(|t| t.abbr).collect();
        assert_eq!(abbrs.len(), STATE_TILES.len());
    }

    #[test]
    fn path_from_grid_cell() {
        let va = StateTiles.get("VA").unwrap();
        assert_eq!(va.name, "Virginia");
        assert_eq!(va.path(), "M80,40h10v10h-10Z");
        assert_eq!(StateTiles.geometry_key("VA").as_deref(), Some("M80,40h10v10h-10Z"));
        assert_eq!(StateTiles.geometry_key("ZZ"), None);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(StateTiles.get("va").is_none());
        assert_eq!(StateTiles.geometry_key("Va"), None);
        assert_eq!(StateTiles.geometry_key("TX").as_deref(), Some("M40,70h10v10h-10Z"));
    }
}
