//! Synthetic per-state complaint dataset.
//!
//! Used by `--demo` and the TUI when no input file is given. Each state draws a
//! complaint rate (per 1,000 residents) from a seeded RNG; the count follows
//! from the state's population, so the absolute and per-capita maps differ in
//! a realistic way (large states dominate counts, not rates).

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::{BinningMode, RegionRecord};
use crate::geo::STATE_TILES;
use crate::math::round_to;

const PRODUCTS: [&str; 6] = [
    "Credit reporting",
    "Debt collection",
    "Mortgage",
    "Credit card",
    "Checking or savings account",
    "Student loan",
];

const ISSUES: [&str; 5] = [
    "Incorrect information on your report",
    "Improper use of your report",
    "Attempts to collect debt not owed",
    "Trouble during payment process",
    "Problem with a purchase shown on your statement",
];

/// Complaint rate range, per 1,000 residents.
const RATE_MIN: f64 = 0.05;
const RATE_MAX: f64 = 2.5;

/// Generate one record per state tile.
///
/// `display_value` is the count in absolute mode and the rate in per-capita mode.
pub fn generate_sample(seed: u64, mode: BinningMode) -> Vec<RegionRecord> {
    let mut rng = StdRng::seed_from_u64(seed);

    STATE_TILES
        .iter()
        .map(|tile| {
            let rate = rng.gen_range(RATE_MIN..RATE_MAX);
            let count = (rate * tile.population_k as f64).round();
            let per_capita = round_to(count / tile.population_k as f64, 2);
            let product = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];
            let issue = ISSUES[rng.gen_range(0..ISSUES.len())];

            RegionRecord {
                name: Some(tile.abbr.to_string()),
                full_name: Some(tile.name.to_string()),
                raw_value: count,
                display_value: match mode {
                    BinningMode::Absolute => count,
                    BinningMode::PerCapita => per_capita,
                },
                per_capita_value: Some(per_capita),
                product_label: Some(product.to_string()),
                issue_label: Some(issue.to_string()),
            }
        })
        .collect()
}
