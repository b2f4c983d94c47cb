//! Legend description and rendering.
//!
//! The core never draws; it hands a `LegendSpec` (title, bins, date caption) to
//! whichever `LegendRenderer` the front end supplies. `LegendLayout` carries the
//! box geometry a pixel renderer would use.

use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{Bin, BinningMode};
use crate::plot::shade_glyph;

/// How far back the legend date caption reaches.
const DATE_RANGE_MONTHS: u32 = 36;

/// Source of "today" for the legend caption.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Everything a renderer needs to draw the legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendSpec {
    pub title: String,
    pub bins: Vec<Bin>,
    pub date_range_label: String,
}

impl LegendSpec {
    pub fn build(mode: BinningMode, bins: &[Bin], clock: &dyn Clock) -> Self {
        Self {
            title: mode.legend_title().to_string(),
            bins: bins.to_vec(),
            date_range_label: date_range_label(clock.today()),
        }
    }
}

/// `"{today - 3 years} - {today}"` in US short date form (`M/D/YYYY`).
///
/// Feb 29 steps back to Feb 28 when the earlier year has no leap day.
pub fn date_range_label(today: NaiveDate) -> String {
    let past = today
        .checked_sub_months(Months::new(DATE_RANGE_MONTHS))
        .unwrap_or(NaiveDate::MIN);
    format!("{} - {}", us_short_date(past), us_short_date(today))
}

fn us_short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Pixel geometry of one legend entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub fill: String,
    pub label: String,
    pub label_x: u32,
    pub label_y: u32,
}

/// Box-and-label legend layout, relative to the legend container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub separator_width: u32,
    /// Vertical offset of the box row below the captions.
    pub boxes_offset_y: u32,
    pub boxes: Vec<LegendBox>,
}

impl LegendLayout {
    pub const BOX_WIDTH: u32 = 50;
    pub const BOX_HEIGHT: u32 = 15;
    pub const BOX_PADDING: u32 = 1;
    pub const BOXES_OFFSET_Y: u32 = 64;

    pub fn from_spec(spec: &LegendSpec) -> Self {
        let pitch = Self::BOX_WIDTH + Self::BOX_PADDING;
        let boxes = spec
            .bins
            .iter()
            .enumerate()
            .map(|(i, bin)| LegendBox {
                x: i as u32 * pitch,
                y: 0,
                width: Self::BOX_WIDTH,
                height: Self::BOX_HEIGHT,
                fill: bin.color.clone(),
                label: bin.name.clone(),
                label_x: 2,
                label_y: Self::BOX_HEIGHT - 2,
            })
            .collect();

        Self {
            separator_width: spec.bins.len() as u32 * pitch,
            boxes_offset_y: Self::BOXES_OFFSET_Y,
            boxes,
        }
    }
}

/// Draws a legend into some output representation.
pub trait LegendRenderer {
    fn render(&self, spec: &LegendSpec) -> String;
}

/// Plain-text legend for terminal output.
///
/// Each bin becomes a `cell_width`-wide swatch of shade glyphs with its label
/// underneath, in bin order.
#[derive(Debug, Clone, Copy)]
pub struct TextLegend {
    pub cell_width: usize,
}

impl Default for TextLegend {
    fn default() -> Self {
        Self { cell_width: 8 }
    }
}

impl LegendRenderer for TextLegend {
    fn render(&self, spec: &LegendSpec) -> String {
        let cell = self.cell_width.max(3);
        let mut out = String::new();

        out.push_str("Key\n");
        out.push_str(&"-".repeat((spec.bins.len() * (cell + 1)).max(cell)));
        out.push('\n');
        out.push_str(&format!("Map shading: {}\n", spec.title));
        out.push_str(&format!("Dates: {}\n", spec.date_range_label));

        if spec.bins.is_empty() {
            out.push_str("(no data classes)\n");
            return out;
        }

        let swatches: Vec<String> = (0..spec.bins.len())
            .map(|i| {
                shade_glyph(Some(i), spec.bins.len())
                    .to_string()
                    .repeat(cell)
            })
            .collect();
        out.push_str(swatches.join(" ").trim_end());
        out.push('\n');

        let labels: Vec<String> = spec
            .bins
            .iter()
            .map(|b| format!("{:<cell$}", truncate(&b.name, cell)))
            .collect();
        out.push_str(labels.join(" ").trim_end());
        out.push('\n');

        out
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bins() -> Vec<Bin> {
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
    }

    #[test]
    fn date_range_is_three_years() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(date_range_label(today), "10/19/2023 - 10/19/2026");
    }

    #[test]
    fn leap_day_steps_back_to_feb_28() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(date_range_label(today), "2/28/2021 - 2/29/2024");
    }

    #[test]
    fn spec_uses_mode_title_and_clock() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        let spec = LegendSpec::build(BinningMode::PerCapita, &bins(), &clock);
        assert_eq!(spec.title, "Complaints per 1,000");
        assert_eq!(spec.date_range_label, "1/5/2022 - 1/5/2025");
        assert_eq!(spec.bins.len(), 2);

        let spec = LegendSpec::build(BinningMode::Absolute, &[], &clock);
        assert_eq!(spec.title, "Complaints");
    }

    #[test]
    fn layout_places_boxes_in_bin_order() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        let spec = LegendSpec::build(BinningMode::Absolute, &bins(), &clock);
        let layout = LegendLayout::from_spec(&spec);

        assert_eq!(layout.separator_width, 102);
        assert_eq!(layout.boxes[0].x, 0);
        assert_eq!(layout.boxes[1].x, 51);
        assert_eq!(layout.boxes[1].fill, "c1");
        assert_eq!(layout.boxes[1].label, "≥ 1K");
        assert_eq!(layout.boxes[1].label_y, 13);
    }

    #[test]
    fn text_legend_snapshot() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        let spec = LegendSpec::build(BinningMode::Absolute, &bins(), &clock);
        let txt = TextLegend { cell_width: 4 }.render(&spec);
        let expected = concat!(
            "Key\n",
            "----------\n",
            "Map shading: Complaints\n",
            "Dates: 1/5/2022 - 1/5/2025\n",
            "░░░░ ████\n",
            "≥ 0  ≥ 1K\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn text_legend_without_bins() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        let spec = LegendSpec::build(BinningMode::Absolute, &[], &clock);
        let txt = TextLegend::default().render(&spec);
        assert!(txt.ends_with("(no data classes)\n"));
    }
}
