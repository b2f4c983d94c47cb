//! Record classification: attach a color and a geometry key to each region.
//!
//! Classification is a pure derivation over `(records, bins, lookup)`:
//! calling it twice with the same inputs yields the same output.

use crate::domain::{Bin, ClassifiedRecord, DEFAULT_TILE_COLOR, RegionRecord};
use crate::geo::GeometryLookup;

/// Classify records for rendering.
///
/// Records without a name are dropped. Input order is preserved.
pub fn classify<L>(records: &[RegionRecord], bins: &[Bin], lookup: &L) -> Vec<ClassifiedRecord>
where
    L: GeometryLookup + ?Sized,
{
    let out: Vec<ClassifiedRecord> = records
        .iter()
        .filter_map(|record| {
            let name = record.key()?;
            let geometry_key = lookup.geometry_key(name);
            if geometry_key.is_none() {
                log::debug!("no geometry for region '{name}'");
            }
            Some(ClassifiedRecord {
                record: record.clone(),
                color: color_for_value(record.display_value, bins).to_string(),
                geometry_key,
            })
        })
        .collect();

    let dropped = records.len() - out.len();
    if dropped > 0 {
        log::info!("dropped {dropped} record(s) without a name");
    }
    out
}

/// Color of the last bin whose `from` is strictly below `value`.
///
/// A value equal to a bin's lower bound lands in the bin before it; values at
/// or below the first bound get the default tile color.
pub fn color_for_value(value: f64, bins: &[Bin]) -> &str {
    match bin_index_for_value(value, bins) {
        Some(idx) => &bins[idx].color,
        None => DEFAULT_TILE_COLOR,
    }
}

/// Index of the bin `color_for_value` picks, or `None` for the default color.
pub fn bin_index_for_value(value: f64, bins: &[Bin]) -> Option<usize> {
    let mut found = None;
    for (idx, bin) in bins.iter().enumerate() {
        if value > bin.from {
            found = Some(idx);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::bins::compute_bins;
    use crate::domain::Palette;
    use crate::geo::StateTiles;

    fn two_bins() -> Vec<Bin> {
        let records = vec![
            RegionRecord::new("A", 0.0),
            RegionRecord::new("B", 500.0),
            RegionRecord::new("C", 1000.0),
        ];
        let palette = Palette::try_new(vec!["c0".to_string(), "c1".to_string()]).unwrap();
        compute_bins(&records, &palette)
    }

    #[test]
    fn colors_for_worked_example() {
        let bins = two_bins();
        assert_eq!(color_for_value(500.0, &bins), "c0");
        assert_eq!(color_for_value(1000.0, &bins), "c1");
        assert_eq!(color_for_value(0.0, &bins), DEFAULT_TILE_COLOR);
    }

    #[test]
    fn value_on_lower_bound_falls_into_previous_bin() {
        // Regression pin: bins[1].from == 501, and 501 is *not* > 501.
        let bins = two_bins();
        assert_eq!(bins[1].from, 501.0);
        assert_eq!(color_for_value(501.0, &bins), "c0");
        assert_eq!(color_for_value(501.5, &bins), "c1");
        // Same rule at the first bound: 1 is not > 1.
        assert_eq!(color_for_value(1.0, &bins), DEFAULT_TILE_COLOR);
    }

    #[test]
    fn empty_bins_give_default_color() {
        assert_eq!(color_for_value(42.0, &[]), DEFAULT_TILE_COLOR);
        assert_eq!(bin_index_for_value(42.0, &[]), None);
    }

    #[test]
    fn classify_drops_nameless_and_keeps_order() {
        let mut nameless = RegionRecord::new("", 10.0);
        nameless.name = None;
        let records = vec![
            RegionRecord::new("TX", 1000.0),
            nameless,
            RegionRecord::new("", 3.0),
            RegionRecord::new("VA", 10.0),
            RegionRecord::new("Atlantis", 600.0),
        ];
        let bins = two_bins();
        let out = classify(&records, &bins, &StateTiles);

        let names: Vec<&str> = out.iter().filter_map(|c| c.record.key()).collect();
        assert_eq!(names, ["TX", "VA", "Atlantis"]);
        assert_eq!(out[0].color, "c1");
        assert_eq!(out[1].color, "c0");
        assert_eq!(out[0].geometry_key.as_deref(), Some("M40,70h10v10h-10Z"));
        assert_eq!(out[2].geometry_key, None);
    }

    #[test]
    fn all_zero_dataset_gets_default_color() {
        let records = vec![RegionRecord::new("A", 0.0), RegionRecord::new("B", 0.0)];
        let bins = compute_bins(&records, &Palette::default());
        assert!(bins.is_empty());

        let lookup: HashMap<String, String> = HashMap::new();
        let out = classify(&records, &bins, &lookup);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.color == DEFAULT_TILE_COLOR));
        assert!(out.iter().all(|c| c.geometry_key.is_none()));
    }

    #[test]
    fn classify_is_idempotent() {
        let records = vec![
            RegionRecord::new("NY", 900.0),
            RegionRecord::new("CA", 120.0),
            RegionRecord::new("WY", 0.0),
        ];
        let bins = compute_bins(&records, &Palette::default());
        let first = classify(&records, &bins, &StateTiles);
        let second = classify(&records, &bins, &StateTiles);
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::bins::{compute_bins, compute_per_capita_bins};
    use crate::domain::Palette;
    use crate::geo::StateTiles;
    use proptest::prelude::*;

    fn palette(n: usize) -> Palette {
        Palette::try_new((0..n).map(|i| format!("c{i}")).collect()).unwrap()
    }

    proptest! {
        #[test]
        fn prop_bin_rank_is_monotonic(
            n in 1usize..8,
            max in 1.0f64..100_000.0,
            per_capita in any::<bool>(),
            mut probes in prop::collection::vec(0.0f64..120_000.0, 2..50)
        ) {
            let recs = vec![RegionRecord::new("M", max)];
            let bins = if per_capita {
                compute_per_capita_bins(&recs, &palette(n))
            } else {
                compute_bins(&recs, &palette(n))
            };
            prop_assume!(bins.windows(2).all(|w| w[0].from <= w[1].from));

            probes.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let ranks: Vec<Option<usize>> =
                probes.iter().map(|&v| bin_index_for_value(v, &bins)).collect();
            prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn prop_classify_keeps_named_in_order(
            entries in prop::collection::vec((prop::option::of("[A-Z]{0,3}"), 0.0f64..5_000.0), 0..40)
        ) {
            let records: Vec<RegionRecord> = entries
                .iter()
                .map(|(name, v)| {
                    let mut r = RegionRecord::new("", *v);
                    r.name = name.clone();
                    r
                })
                .collect();
            let bins = compute_bins(&records, &palette(4));
            let out = classify(&records, &bins, &StateTiles);

            let expected: Vec<&RegionRecord> = records.iter().filter(|r| r.key().is_some()).collect();
            prop_assert_eq!(out.len(), expected.len());
            for (c, r) in out.iter().zip(expected) {
                prop_assert_eq!(&c.record, r);
            }
            prop_assert_eq!(&out, &classify(&records, &bins, &StateTiles));
        }
    }
}
