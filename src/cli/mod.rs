//! Command-line parsing for the tile map tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the binning/classification code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tilemap", version, about = "Choropleth tile map binning and classification")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a dataset, print the summary, bins, tile map and legend.
    Render(MapArgs),
    /// Print the bin table only (useful for scripting).
    Bins(MapArgs),
    /// Write the classified map as JSON for an external chart renderer.
    Export(ExportArgs),
    /// Re-render a previously exported map JSON in the terminal.
    Show(ShowArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `tilemap render`, but renders
    /// the map with terminal colors using Ratatui.
    Tui(MapArgs),
}

/// Common options for loading and classifying a dataset.
#[derive(Debug, Args, Clone)]
pub struct MapArgs {
    /// Region data file (.csv or .json). Prompts for one when omitted.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Use the built-in synthetic per-state dataset instead of a file.
    #[arg(long, conflicts_with = "file")]
    pub demo: bool,

    /// Random seed for the synthetic dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Bin per-capita rates instead of absolute counts.
    #[arg(long)]
    pub per_capita: bool,

    /// Palette override: colors separated by `;` (or `,` when no color has commas).
    ///
    /// Falls back to `TILEMAP_PALETTE` (also read from `.env`), then the default palette.
    #[arg(long)]
    pub palette: Option<String>,

    /// Disable the terminal tile map.
    #[arg(long)]
    pub no_plot: bool,

    /// Columns per tile in the terminal tile map.
    #[arg(long, default_value_t = 6)]
    pub tile_width: usize,

    /// Also write the classified map as JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for `tilemap export`.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Output path for the map JSON.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: PathBuf,
}

/// Options for showing a saved map.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Map JSON file produced by `tilemap export` or `--export`.
    #[arg(long, value_name = "JSON")]
    pub map: PathBuf,

    /// Columns per tile.
    #[arg(long, default_value_t = 6)]
    pub tile_width: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_render_flags() {
        let cli = Cli::try_parse_from([
            "tilemap",
            "render",
            "-f",
            "states.csv",
            "--per-capita",
            "--palette",
            "#eee;#999;#333",
            "--tile-width",
            "8",
        ])
        .unwrap();

        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.file, Some(PathBuf::from("states.csv")));
        assert!(args.per_capita);
        assert_eq!(args.palette.as_deref(), Some("#eee;#999;#333"));
        assert_eq!(args.tile_width, 8);
        assert!(!args.no_plot);
    }

    #[test]
    fn demo_conflicts_with_file() {
        let err = Cli::try_parse_from(["tilemap", "bins", "--demo", "-f", "x.csv"]);
        assert!(err.is_err());
    }

    #[test]
    fn export_requires_out() {
        assert!(Cli::try_parse_from(["tilemap", "export", "--demo"]).is_err());
        let cli = Cli::try_parse_from(["tilemap", "export", "--demo", "-o", "map.json"]).unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert!(args.map.demo);
        assert_eq!(args.out, PathBuf::from("map.json"));
    }
}
