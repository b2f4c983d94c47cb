//! CSV/JSON ingest and normalization.
//!
//! This module is responsible for turning a region dataset into a clean list of
//! `RegionRecord`s that are safe to bin.
//!
//! Design goals:
//! - **Lenient schema**: camelCase, snake_case and legacy column names are all accepted
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No classification here**: nameless rows are kept; the classifier drops them

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use serde::Deserialize;

use crate::bins::max_display_value;
use crate::domain::{BinningMode, RegionRecord};
use crate::error::AppError;

/// Summary stats about the records actually kept.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_records: usize,
    pub n_named: usize,
    pub max_display_value: f64,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// CSV line number, or 1-based element index for JSON arrays.
    pub line: usize,
    pub name: Option<String>,
    pub message: String,
}

/// Ingest output: normalized records + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<RegionRecord>,
    pub source_label: String,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestedData {
    /// Wrap records that did not come from a file (e.g. the synthetic dataset).
    pub fn from_records(records: Vec<RegionRecord>, source_label: impl Into<String>) -> Result<Self, AppError> {
        let rows = records.len();
        finish(records, source_label.into(), Vec::new(), rows)
    }
}

/// A raw input row; every field is optional until normalized.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default, alias = "value")]
    raw_value: Option<f64>,
    #[serde(default)]
    display_value: Option<f64>,
    #[serde(default, alias = "perCapita")]
    per_capita_value: Option<f64>,
    #[serde(default, alias = "product")]
    product_label: Option<String>,
    #[serde(default, alias = "issue")]
    issue_label: Option<String>,
}

/// Load region records from a `.csv` or `.json` file.
///
/// When a row has no `displayValue`, it is derived from `mode`: the raw value
/// for absolute maps, the per-capita value for per-capita maps.
pub fn load_records(path: &Path, mode: BinningMode) -> Result<IngestedData, AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    log::info!("loading {} ({mode:?})", path.display());
    match ext.as_str() {
        "csv" => load_csv(path, mode),
        "json" => load_json(path, mode),
        _ => Err(AppError::new(
            2,
            format!(
                "Unsupported input '{}': expected a .csv or .json file.",
                path.display()
            ),
        )),
    }
}

fn load_csv(path: &Path, mode: BinningMode) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records() is 0-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    name: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let row = match parse_csv_row(&record, &header_map) {
            Ok(row) => row,
            Err(message) => {
                row_errors.push(RowError {
                    line,
                    name: get_optional(&record, &header_map, NAME_COLUMNS).map(str::to_string),
                    message,
                });
                continue;
            }
        };

        push_normalized(row, mode, line, &mut records, &mut row_errors);
    }

    finish(records, path.display().to_string(), row_errors, rows_read)
}

fn load_json(path: &Path, mode: BinningMode) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open JSON '{}': {e}", path.display())))?;
    let values: Vec<serde_json::Value> = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid JSON (expected an array of records): {e}")))?;

    let rows_read = values.len();
    let mut records = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, value) in values.into_iter().enumerate() {
        let line = idx + 1;
        match serde_json::from_value::<RegionRow>(value) {
            Ok(row) => push_normalized(row, mode, line, &mut records, &mut row_errors),
            Err(e) => row_errors.push(RowError {
                line,
                name: None,
                message: format!("Invalid record: {e}"),
            }),
        }
    }

    finish(records, path.display().to_string(), row_errors, rows_read)
}

fn push_normalized(
    row: RegionRow,
    mode: BinningMode,
    line: usize,
    records: &mut Vec<RegionRecord>,
    row_errors: &mut Vec<RowError>,
) {
    let name = row.name.clone();
    match normalize_row(row, mode) {
        Ok(record) => records.push(record),
        Err(message) => row_errors.push(RowError { line, name, message }),
    }
}

fn finish(
    records: Vec<RegionRecord>,
    source_label: String,
    row_errors: Vec<RowError>,
    rows_read: usize,
) -> Result<IngestedData, AppError> {
    for err in &row_errors {
        log::warn!("skipping row {}: {}", err.line, err.message);
    }

    let rows_used = records.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows remain after ingest."));
    }

    let stats = DatasetStats {
        n_records: rows_used,
        n_named: records.iter().filter(|r| r.key().is_some()).count(),
        max_display_value: max_display_value(&records),
    };

    Ok(IngestedData {
        records,
        source_label,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn normalize_row(row: RegionRow, mode: BinningMode) -> Result<RegionRecord, String> {
    let display_value = match (row.display_value, mode) {
        (Some(v), _) => v,
        (None, BinningMode::Absolute) => row
            .raw_value
            .ok_or_else(|| "Missing `displayValue` and `rawValue`.".to_string())?,
        (None, BinningMode::PerCapita) => row
            .per_capita_value
            .ok_or_else(|| "Missing `displayValue` and `perCapitaValue`.".to_string())?,
    };
    if !display_value.is_finite() {
        return Err("Non-finite display value.".to_string());
    }

    let raw_value = row.raw_value.unwrap_or(display_value);
    if !raw_value.is_finite() {
        return Err("Non-finite raw value.".to_string());
    }

    Ok(RegionRecord {
        name: row.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        full_name: row.full_name.filter(|s| !s.is_empty()),
        raw_value,
        display_value,
        per_capita_value: row.per_capita_value.filter(|v| v.is_finite()),
        product_label: row.product_label.filter(|s| !s.is_empty()),
        issue_label: row.issue_label.filter(|s| !s.is_empty()),
    })
}

const NAME_COLUMNS: &[&str] = &["name"];
const FULL_NAME_COLUMNS: &[&str] = &["fullname"];
const RAW_COLUMNS: &[&str] = &["rawvalue", "value"];
const DISPLAY_COLUMNS: &[&str] = &["displayvalue"];
const PER_CAPITA_COLUMNS: &[&str] = &["percapitavalue", "percapita"];
const PRODUCT_COLUMNS: &[&str] = &["productlabel", "product"];
const ISSUE_COLUMNS: &[&str] = &["issuelabel", "issue"];

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

/// Lowercase, strip a UTF-8 BOM, and drop `_`/`-`/spaces so that
/// `displayValue`, `display_value` and `Display Value` all match.
fn normalize_header_name(name: &str) -> String {
    name.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn has_any(header_map: &HashMap<String, usize>, names: &[&str]) -> bool {
    names.iter().any(|n| header_map.contains_key(*n))
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    if !has_any(header_map, NAME_COLUMNS) {
        return Err(AppError::new(2, "Missing required column: `name`"));
    }
    if !has_any(header_map, RAW_COLUMNS)
        && !has_any(header_map, DISPLAY_COLUMNS)
        && !has_any(header_map, PER_CAPITA_COLUMNS)
    {
        return Err(AppError::new(
            2,
            "Missing value column: expected one of `displayValue`, `rawValue`/`value`, `perCapitaValue`/`perCapita`.",
        ));
    }
    Ok(())
}

fn parse_csv_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<RegionRow, String> {
    let text = |cols: &[&str]| get_optional(record, header_map, cols).map(str::to_string);

    Ok(RegionRow {
        name: text(NAME_COLUMNS),
        full_name: text(FULL_NAME_COLUMNS),
        raw_value: parse_opt_f64(get_optional(record, header_map, RAW_COLUMNS), "rawValue")?,
        display_value: parse_opt_f64(get_optional(record, header_map, DISPLAY_COLUMNS), "displayValue")?,
        per_capita_value: parse_opt_f64(
            get_optional(record, header_map, PER_CAPITA_COLUMNS),
            "perCapitaValue",
        )?,
        product_label: text(PRODUCT_COLUMNS),
        issue_label: text(ISSUE_COLUMNS),
    })
}

/// First non-empty cell among the given column aliases.
fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    names: &[&str],
) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|n| header_map.get(*n))
        .filter_map(|&idx| record.get(idx))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Parse an optional number, accepting thousands separators (`"12,345"`).
fn parse_opt_f64(s: Option<&str>, column: &str) -> Result<Option<f64>, String> {
    let Some(s) = s else {
        return Ok(None);
    };
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("Invalid number in `{column}`: '{s}'"))
}
