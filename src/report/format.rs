//! Reporting utilities: number formatting, tooltips, and terminal tables.
//!
//! We keep formatting code in one place so:
//! - the binning/classification code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::classify::bin_index_for_value;
use crate::domain::{Bin, ClassifiedRecord, MapConfig, RegionRecord};
use crate::io::ingest::IngestedData;
use crate::legend::LegendSpec;
use crate::math::round_to;

/// en-US number formatting: comma-grouped integer part, at most 3 fraction
/// digits, trailing zeros dropped.
pub fn format_thousands(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let rounded = round_to(x.abs(), 3);
    let fixed = format!("{rounded:.3}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::new();
    if x < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Text shown on a map tile: region name over its display value.
pub fn tile_label(record: &RegionRecord) -> String {
    format!(
        "{}\n{}",
        record.key().unwrap_or(""),
        format_thousands(record.display_value)
    )
}

/// Hover details for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl std::fmt::Display for Tooltip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        for (label, value) in &self.rows {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}

/// Build the tooltip for a region.
///
/// Optional rows (per capita, top product, top issue) are omitted when the
/// value is missing, empty, or zero.
pub fn tooltip(record: &RegionRecord) -> Tooltip {
    let title = record
        .full_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(record.key())
        .unwrap_or("")
        .to_string();

    let mut rows = vec![("Complaints".to_string(), format_thousands(record.raw_value))];
    if let Some(pc) = record.per_capita_value.filter(|v| *v != 0.0 && !v.is_nan()) {
        rows.push(("Per capita".to_string(), pc.to_string()));
    }
    if let Some(product) = record.product_label.as_deref().filter(|s| !s.is_empty()) {
        rows.push((
            "Product with highest complaint volume".to_string(),
            product.to_string(),
        ));
    }
    if let Some(issue) = record.issue_label.as_deref().filter(|s| !s.is_empty()) {
        rows.push((
            "Issue with highest complaint volume".to_string(),
            issue.to_string(),
        ));
    }

    Tooltip { title, rows }
}

/// Format the run summary (input, mode, ingest stats, legend captions).
pub fn format_run_summary(
    ingest: &IngestedData,
    classified: &[ClassifiedRecord],
    legend: &LegendSpec,
    config: &MapConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== tilemap - Tile Map Classification ===\n");
    out.push_str(&format!("Input: {}\n", ingest.source_label));
    out.push_str(&format!("Map shading: {}\n", legend.title));
    out.push_str(&format!("Dates: {}\n", legend.date_range_label));
    out.push_str(&format!("Palette: {} color(s)\n", config.palette.len()));
    out.push_str(&format!(
        "Rows: read={} used={} errors={} | classified={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len(),
        classified.len()
    ));
    out.push_str(&format!(
        "Values: max={}\n",
        format_thousands(ingest.stats.max_display_value)
    ));

    for err in ingest.row_errors.iter().take(10) {
        out.push_str(&format!("  line {}: {}\n", err.line, err.message));
    }
    if ingest.row_errors.len() > 10 {
        out.push_str(&format!("  ... {} more\n", ingest.row_errors.len() - 10));
    }

    out.push('\n');
    out
}

/// Format the bin table with per-bin region counts.
pub fn format_bins(bins: &[Bin], classified: &[ClassifiedRecord]) -> String {
    if bins.is_empty() {
        return "No data classes (maximum value is 0).\n".to_string();
    }

    let mut counts = vec![0usize; bins.len()];
    let mut unclassified = 0usize;
    for rec in classified {
        match bin_index_for_value(rec.record.display_value, bins) {
            Some(idx) => counts[idx] += 1,
            None => unclassified += 1,
        }
    }

    let mut out = String::new();
    out.push_str(
        format!(
            "{:>2} {:>12} {:>12} {:<26} {:<10} {:>7}\n",
            "#", "from", "to", "color", "label", "regions"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<2} {:-<12} {:-<12} {:-<26} {:-<10} {:-<7}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (i, (bin, count)) in bins.iter().zip(&counts).enumerate() {
        let to = bin.to.map(format_thousands).unwrap_or_else(|| "-".to_string());
        out.push_str(
            format!(
                "{:>2} {:>12} {:>12} {:<26} {:<10} {:>7}\n",
                i,
                format_thousands(bin.from),
                to,
                truncate(&bin.color, 26),
                truncate(&bin.name, 10),
                count
            )
            .trim_end(),
        );
        out.push('\n');
    }

    if unclassified > 0 {
        out.push_str(&format!("({unclassified} region(s) below the first bin)\n"));
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
