//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the input dataset and palette
//! - runs binning + classification
//! - prints reports/tile maps
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ExportArgs, MapArgs, ShowArgs};
use crate::domain::{BinningMode, InputSource, MapConfig, Palette};
use crate::error::AppError;
use crate::legend::{LegendRenderer, TextLegend};

pub mod pipeline;

/// Environment variable holding a palette override.
pub const PALETTE_ENV: &str = "TILEMAP_PALETTE";

/// Entry point for the `tilemap` binary.
pub fn run() -> Result<(), AppError> {
    // Bare `tilemap` (or `tilemap --flags`) behaves like `tilemap tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Render(args) => handle_map(args, OutputMode::Full),
        Command::Bins(args) => handle_map(args, OutputMode::BinsOnly),
        Command::Export(args) => handle_export(args),
        Command::Show(args) => handle_show(args),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    BinsOnly,
}

fn handle_map(args: MapArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = map_config_from_args(&args, InputFallback::Prompt)?;
    let run = pipeline::run_map(&config)?;

    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format_run_summary(&run.ingest, &run.classified, &run.legend, &config)
        );
    }

    println!("{}", crate::report::format_bins(&run.bins, &run.classified));

    if mode == OutputMode::Full && config.plot {
        println!(
            "{}",
            crate::plot::render_tile_map(&run.classified, &run.bins, config.tile_width)
        );
        println!("{}", TextLegend::default().render(&run.legend));
    }

    if let Some(path) = &config.export_json {
        crate::io::export::write_map_json(path, &run.to_map_file(&config))?;
    }

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = map_config_from_args(&args.map, InputFallback::Prompt)?;
    let run = pipeline::run_map(&config)?;
    crate::io::export::write_map_json(&args.out, &run.to_map_file(&config))?;
    println!(
        "Wrote {} region(s), {} bin(s) to {}",
        run.classified.len(),
        run.bins.len(),
        args.out.display()
    );
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let map = crate::io::export::read_map_json(&args.map)?;
    println!(
        "{}",
        crate::plot::render_tile_map(&map.data, &map.bins, args.tile_width)
    );
    println!("{}", TextLegend::default().render(&map.legend));
    Ok(())
}

fn handle_tui(args: MapArgs) -> Result<(), AppError> {
    let config = map_config_from_args(&args, InputFallback::Demo)?;
    crate::tui::run(config)
}

/// What to do when neither `-f` nor `--demo` is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFallback {
    /// Ask on stdin (line-oriented commands).
    Prompt,
    /// Use the synthetic dataset (the TUI cannot prompt on stdin).
    Demo,
}

pub fn map_config_from_args(args: &MapArgs, fallback: InputFallback) -> Result<MapConfig, AppError> {
    let input = if args.demo {
        InputSource::Demo { seed: args.seed }
    } else if let Some(path) = &args.file {
        InputSource::File(crate::cli::picker::validate_data_path(path)?)
    } else {
        match fallback {
            InputFallback::Prompt => InputSource::File(crate::cli::picker::prompt_for_data_path()?),
            InputFallback::Demo => InputSource::Demo { seed: args.seed },
        }
    };

    dotenvy::dotenv().ok();
    let palette = resolve_palette(args.palette.as_deref(), std::env::var(PALETTE_ENV).ok())?;

    Ok(MapConfig {
        input,
        mode: BinningMode::from_flag(args.per_capita),
        palette,
        plot: !args.no_plot,
        tile_width: args.tile_width,
        export_json: args.export.clone(),
    })
}

/// Pick the palette: CLI flag, then environment, then the default.
pub fn resolve_palette(flag: Option<&str>, env: Option<String>) -> Result<Palette, AppError> {
    if let Some(s) = flag {
        return Palette::parse(s);
    }
    match env {
        Some(s) if !s.trim().is_empty() => {
            log::debug!("palette from {PALETTE_ENV}");
            Palette::parse(&s)
        }
        _ => Ok(Palette::default()),
    }
}

/// Rewrite argv so `tilemap` defaults to `tilemap tui`.
///
/// Rules:
/// - `tilemap`                          -> `tilemap tui`
/// - `tilemap --per-capita ...`         -> `tilemap tui --per-capita ...`
/// - `tilemap --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "render" | "bins" | "export" | "show" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["tilemap"])), argv(&["tilemap", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["tilemap", "--per-capita"])),
            argv(&["tilemap", "tui", "--per-capita"])
        );
        assert_eq!(rewrite_args(argv(&["tilemap", "--help"])), argv(&["tilemap", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["tilemap", "bins", "--demo"])),
            argv(&["tilemap", "bins", "--demo"])
        );
    }

    #[test]
    fn palette_precedence() {
        let flag = resolve_palette(Some("#111;#222"), Some("#333".to_string())).unwrap();
        assert_eq!(flag.len(), 2);

        let env = resolve_palette(None, Some("#333,#444,#555".to_string())).unwrap();
        assert_eq!(env.colors(), ["#333", "#444", "#555"]);

        assert_eq!(resolve_palette(None, Some("  ".to_string())).unwrap(), Palette::default());
        assert_eq!(resolve_palette(None, None).unwrap(), Palette::default());
        assert!(resolve_palette(Some(";"), None).is_err());
    }

    #[test]
    fn config_from_demo_args() {
        let args = MapArgs {
            file: None,
            demo: false,
            seed: 9,
            per_capita: true,
            palette: Some("#a;#b".to_string()),
            no_plot: true,
            tile_width: 5,
            export: None,
        };
        let config = map_config_from_args(&args, InputFallback::Demo).unwrap();
        assert_eq!(config.input, InputSource::Demo { seed: 9 });
        assert_eq!(config.mode, BinningMode::PerCapita);
        assert_eq!(config.palette.len(), 2);
        assert!(!config.plot);
    }
}
