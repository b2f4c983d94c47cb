//! Strategy selection: one entry point for both binning modes.

use crate::domain::{Bin, BinningMode, Palette, RegionRecord};

use super::calculator::{compute_bins, compute_per_capita_bins};

impl BinningMode {
    /// Compute bins for `records` using this mode.
    pub fn compute(self, records: &[RegionRecord], palette: &Palette) -> Vec<Bin> {
        match self {
            BinningMode::Absolute => compute_bins(records, palette),
            BinningMode::PerCapita => compute_per_capita_bins(records, palette),
        }
    }

    /// Number of bins produced for a non-degenerate dataset.
    pub fn expected_bin_count(self, palette: &Palette) -> usize {
        match self {
            BinningMode::Absolute => palette.len(),
            BinningMode::PerCapita => palette.len() + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_dispatches_to_matching_calculator() {
        let records = vec![RegionRecord::new("A", 10.0), RegionRecord::new("B", 3.0)];
        let palette = Palette::default();

        let abs = BinningMode::Absolute.compute(&records, &palette);
        assert_eq!(abs, compute_bins(&records, &palette));
        assert_eq!(abs.len(), BinningMode::Absolute.expected_bin_count(&palette));

        let pc = BinningMode::PerCapita.compute(&records, &palette);
        assert_eq!(pc, compute_per_capita_bins(&records, &palette));
        assert_eq!(pc.len(), BinningMode::PerCapita.expected_bin_count(&palette));
    }
}
