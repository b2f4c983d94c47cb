//! Bin calculation for the tile map legend and color classes.
//!
//! Both strategies split `[1, max]` into `palette.len()` equal steps:
//!
//! - absolute: `step = (max - 1 + 1) / n`, bounds rounded to integers,
//!   labels in thousands (`≥ 12K`)
//! - per-capita: `step = (max - 1) / n`, bounds rounded to 2 decimals, plus a
//!   leading `>0` bin covering `[0, step)`
//!
//! The last bin is always unbounded. A dataset whose maximum is 0 yields no
//! bins at all.

use crate::domain::{Bin, Palette, RegionRecord, ZERO_BIN_COLOR};
use crate::math::{js_round, round_to};

/// Lower bound of the first palette bin.
const MIN_VALUE: f64 = 1.0;

/// Maximum `display_value` across records, folded from 0.
///
/// Empty input and all-negative input both give `0.0`. `NaN` values are ignored.
pub fn max_display_value(records: &[RegionRecord]) -> f64 {
    records
        .iter()
        .fold(0.0_f64, |acc, r| acc.max(r.display_value))
}

/// Bins over absolute counts.
pub fn compute_bins(records: &[RegionRecord], palette: &Palette) -> Vec<Bin> {
    let max = max_display_value(records);
    if max <= 0.0 {
        log::debug!("max display value is 0; no absolute bins");
        return Vec::new();
    }

    let bin_count = palette.len();
    let step = (max - MIN_VALUE + 1.0) / bin_count as f64;

    let mut bins = Vec::with_capacity(bin_count);
    let mut curr = MIN_VALUE;
    for color in palette.colors() {
        let thousands = js_round(curr / 1000.0);
        bins.push(Bin {
            from: js_round(curr),
            to: Some(js_round(curr + step)),
            color: color.clone(),
            name: if thousands > 0.0 {
                format!("≥ {thousands}K")
            } else {
                "≥ 0".to_string()
            },
        });
        curr += step;
    }

    if let Some(last) = bins.last_mut() {
        last.to = None;
    }

    log::debug!("computed {} absolute bins (max={max}, step={step})", bins.len());
    bins
}

/// Bins over per-capita rates.
///
/// The running lower bound is rounded to 2 decimals before each bin and the
/// *rounded* value is carried into the next step, so rounding compounds.
pub fn compute_per_capita_bins(records: &[RegionRecord], palette: &Palette) -> Vec<Bin> {
    let max = max_display_value(records);
    if max <= 0.0 {
        log::debug!("max display value is 0; no per-capita bins");
        return Vec::new();
    }

    let bin_count = palette.len();
    let step = (max - MIN_VALUE) / bin_count as f64;

    let mut bins = Vec::with_capacity(bin_count + 1);
    bins.push(Bin {
        from: 0.0,
        to: Some(step),
        color: ZERO_BIN_COLOR.to_string(),
        name: ">0".to_string(),
    });

    let mut curr = MIN_VALUE;
    for color in palette.colors() {
        curr = round_to(curr, 2);
        bins.push(Bin {
            from: curr,
            to: Some(round_to(curr + step, 2)),
            color: color.clone(),
            name: format!("≥ {curr}"),
        });
        curr += step;
    }

    if let Some(last) = bins.last_mut() {
        last.to = None;
    }

    log::debug!("computed {} per-capita bins (max={max}, step={step})", bins.len());
    bins
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(values: &[f64]) -> Vec<RegionRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| RegionRecord::new(format!("R{i}"), v))
            .collect()
    }

    fn palette(n: usize) -> Palette {
        Palette::try_new((0..n).map(|i| format!("c{i}")).collect()).unwrap()
    }

    #[test]
    fn two_color_example() {
        let bins = compute_bins(&records(&[0.0, 500.0, 1000.0]), &palette(2));
        assert_eq!(
            bins,
            vec![
                Bin {
                    from: 1.0,
                    to: Some(501.0),
                    color: "c0".to_string(),
                    name: "≥ 0".to_string(),
                },
                Bin {
                    from: 501.0,
                    to: None,
                    color: "c1".to_string(),
                    name: "≥ 1K".to_string(),
                },
            ]
        );
    }

    #[test]
    fn labels_in_thousands() {
        let bins = compute_bins(&records(&[60_000.0]), &palette(6));
        let names: Vec<&str> = bins.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["≥ 0", "≥ 10K", "≥ 20K", "≥ 30K", "≥ 40K", "≥ 50K"]);
        assert_eq!(bins[1].from, 10_001.0);
        assert_eq!(bins[4].to, Some(50_001.0));
        assert_eq!(bins[5].to, None);
    }

    #[test]
    fn all_zero_or_empty_gives_no_bins() {
        assert!(compute_bins(&records(&[0.0, 0.0]), &palette(3)).is_empty());
        assert!(compute_bins(&[], &palette(3)).is_empty());
        assert!(compute_per_capita_bins(&records(&[0.0]), &palette(3)).is_empty());
        assert!(compute_per_capita_bins(&[], &palette(3)).is_empty());
    }

    #[test]
    fn negative_and_nan_values_do_not_raise_max() {
        let recs = records(&[-5.0, f64::NAN]);
        assert_eq!(max_display_value(&recs), 0.0);
        assert!(compute_bins(&recs, &palette(2)).is_empty());
    }

    #[test]
    fn per_capita_prepends_zero_bin() {
        let bins = compute_per_capita_bins(&records(&[0.5, 4.0]), &palette(3));
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].from, 0.0);
        assert_eq!(bins[0].to, Some(1.0));
        assert_eq!(bins[0].color, ZERO_BIN_COLOR);
        assert_eq!(bins[0].name, ">0");
        assert_eq!(bins[1].name, "≥ 1");
        assert_eq!(bins[2].name, "≥ 2");
        assert_eq!(bins[3].name, "≥ 3");
        assert_eq!(bins[3].to, None);
    }

    #[test]
    fn per_capita_rounding_compounds() {
        // step = 1/3: re-deriving 1 + 2*step would give 1.67; carrying the
        // rounded 1.33 forward gives 1.66.
        let bins = compute_per_capita_bins(&records(&[2.0]), &palette(3));
        let froms: Vec<f64> = bins.iter().map(|b| b.from).collect();
        assert_eq!(froms, [0.0, 1.0, 1.33, 1.66]);
        assert_eq!(bins[1].to, Some(1.33));
        assert_eq!(bins[2].to, Some(1.66));
        assert_eq!(bins[3].name, "≥ 1.66");
    }
}
