//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during binning and classification
//! - exported to JSON for an external chart renderer
//! - reloaded later by other tools

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default map shading palette (lightest to darkest).
pub const DEFAULT_PALETTE: [&str; 6] = [
    "rgba(247, 248, 249, 0.5)",
    "rgba(212, 231, 230, 0.5)",
    "rgba(180, 210, 209, 0.5)",
    "rgba(137, 182, 181, 0.5)",
    "rgba(86, 149, 148, 0.5)",
    "rgba(37, 116, 115, 0.5)",
];

/// Color of the fixed `>0` bin that per-capita mode prepends.
pub const ZERO_BIN_COLOR: &str = "#fff";

/// Color assigned to values that fall into no bin.
pub const DEFAULT_TILE_COLOR: &str = "#ffffff";

/// Which binning strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinningMode {
    /// Bins over absolute counts, labelled in thousands.
    #[default]
    Absolute,
    /// Bins over per-capita rates, with a leading `>0` bin.
    PerCapita,
}

impl BinningMode {
    pub fn from_flag(per_capita: bool) -> Self {
        if per_capita {
            BinningMode::PerCapita
        } else {
            BinningMode::Absolute
        }
    }

    /// Legend title describing what the shading represents.
    pub fn legend_title(self) -> &'static str {
        match self {
            BinningMode::Absolute => "Complaints",
            BinningMode::PerCapita => "Complaints per 1,000",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            BinningMode::Absolute => BinningMode::PerCapita,
            BinningMode::PerCapita => BinningMode::Absolute,
        }
    }
}

/// One geographic unit's data row (e.g. one state).
///
/// `display_value` is the number that gets binned; depending on the mode it is
/// either the raw count or the per-capita rate. Legacy field names (`value`,
/// `perCapita`, `product`, `issue`) are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(alias = "value")]
    pub raw_value: f64,
    pub display_value: f64,
    #[serde(default, alias = "perCapita", skip_serializing_if = "Option::is_none")]
    pub per_capita_value: Option<f64>,
    #[serde(default, alias = "product", skip_serializing_if = "Option::is_none")]
    pub product_label: Option<String>,
    #[serde(default, alias = "issue", skip_serializing_if = "Option::is_none")]
    pub issue_label: Option<String>,
}

impl RegionRecord {
    /// Minimal record: a name and a value used both raw and for display.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: Some(name.into()),
            full_name: None,
            raw_value: value,
            display_value: value,
            per_capita_value: None,
            product_label: None,
            issue_label: None,
        }
    }

    /// The identifying name, if present and non-empty.
    pub fn key(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// A value range mapped to a color and a legend label.
///
/// The interval is `[from, to)`; `to == None` means unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub from: f64,
    pub to: Option<f64>,
    pub color: String,
    pub name: String,
}

/// Ordered, non-empty sequence of color tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette(Vec<String>);

impl Palette {
    pub fn try_new(colors: Vec<String>) -> Result<Self, AppError> {
        if colors.is_empty() {
            return Err(AppError::new(2, "Palette must contain at least one color."));
        }
        Ok(Self(colors))
    }

    /// Parse a palette from a single string.
    ///
    /// Tokens are separated by `;` when present (so `rgba(...)` tokens can keep
    /// their commas), otherwise by `,`.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        let sep = if s.contains(';') { ';' } else { ',' };
        let colors: Vec<String> = s
            .split(sep)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Self::try_new(colors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect())
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = AppError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Palette> for Vec<String> {
    fn from(value: Palette) -> Self {
        value.0
    }
}

/// A record annotated for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub record: RegionRecord,
    pub color: String,
    pub geometry_key: Option<String>,
}

/// Where region records come from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// CSV or JSON file, chosen by extension.
    File(PathBuf),
    /// Synthetic per-state dataset.
    Demo { seed: u64 },
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, environment, and defaults.
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub input: InputSource,
    pub mode: BinningMode,
    pub palette: Palette,
    /// Print the terminal tile map after the report.
    pub plot: bool,
    /// Columns per tile in the terminal tile map.
    pub tile_width: usize,
    pub export_json: Option<PathBuf>,
}
