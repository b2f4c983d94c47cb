//! Ratatui-based terminal UI.
//!
//! The TUI renders the classified state tile map with terminal colors, a legend
//! panel, and the tooltip of the selected state.

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::pipeline::{MapRun, run_map};
use crate::domain::{ClassifiedRecord, DEFAULT_TILE_COLOR, MapConfig};
use crate::error::AppError;
use crate::geo::{STATE_TILES, StateTile};
use crate::geo::states::{GRID_COLS, GRID_ROWS};

/// Start the TUI.
pub fn run(config: MapConfig) -> Result<(), AppError> {
    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: MapConfig,
    run: MapRun,
    /// Index into `STATE_TILES`.
    selected: usize,
    status: String,
}

impl App {
    fn new(config: MapConfig) -> Result<Self, AppError> {
        // Load before touching the terminal so input errors print normally.
        let run = run_map(&config)?;
        let status = format!("{} region(s) from {}", run.classified.len(), run.ingest.source_label);
        Ok(Self {
            config,
            run,
            selected: 0,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.move_selection(-1, 0),
            KeyCode::Down => self.move_selection(1, 0),
            KeyCode::Left => self.move_selection(0, -1),
            KeyCode::Right => self.move_selection(0, 1),
            KeyCode::Char('m') => self.toggle_mode(),
            _ => {}
        }
        false
    }

    fn move_selection(&mut self, d_row: isize, d_col: isize) {
        if let Some(next) = neighbor(self.selected, d_row, d_col) {
            self.selected = next;
        }
    }

    fn toggle_mode(&mut self) {
        let mut next = self.config.clone();
        next.mode = self.config.mode.toggled();
        match run_map(&next) {
            Ok(run) => {
                self.config = next;
                self.run = run;
                self.status = format!(
                    "mode: {} | classes: {}",
                    self.config.mode.legend_title(),
                    self.run.bins.len()
                );
            }
            Err(err) => {
                log::warn!("mode switch failed: {err}");
                self.status = format!("Mode switch failed: {err}");
            }
        }
    }

    fn records_by_abbr(&self) -> HashMap<String, &ClassifiedRecord> {
        self.run
            .classified
            .iter()
            .filter_map(|c| c.record.key().map(|k| (k.to_string(), c)))
            .collect()
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("tilemap", Style::default().fg(Color::Cyan)),
                Span::raw(format!(": {}", self.run.legend.title)),
            ]),
            Line::from(Span::styled(
                format!(
                    "source: {} | regions: {} | classes: {} | max: {}",
                    self.run.ingest.source_label,
                    self.run.classified.len(),
                    self.run.bins.len(),
                    crate::report::format_thousands(self.run.ingest.stats.max_display_value),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(40)])
            .split(area);

        self.draw_map(frame, chunks[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(chunks[1]);

        self.draw_legend(frame, side[0]);
        self.draw_tooltip(frame, side[1]);
    }

    fn draw_map(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Map").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let cell_w = (inner.width / GRID_COLS as u16).max(1);
        let cell_h = (inner.height / GRID_ROWS as u16).max(1);
        let by_abbr = self.records_by_abbr();
        let empty_bg = parse_color(DEFAULT_TILE_COLOR).unwrap_or(Color::White);

        for (idx, tile) in STATE_TILES.iter().enumerate() {
            let x = inner.x + tile.col as u16 * cell_w;
            let y = inner.y + tile.row as u16 * cell_h;
            if x >= inner.right() || y >= inner.bottom() {
                continue;
            }
            let rect = Rect {
                x,
                y,
                width: cell_w.saturating_sub(1).max(1).min(inner.right() - x),
                height: cell_h.min(inner.bottom() - y),
            };

            let (bg, text) = match by_abbr.get(tile.abbr) {
                Some(rec) => (
                    parse_color(&rec.color).unwrap_or(empty_bg),
                    crate::report::tile_label(&rec.record),
                ),
                None => (empty_bg, tile.abbr.to_string()),
            };

            let mut style = Style::default().bg(bg).fg(text_color_for(bg));
            if idx == self.selected {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            let p = Paragraph::new(text).style(style).alignment(Alignment::Center);
            frame.render_widget(p, rect);
        }
    }

    fn draw_legend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let legend = &self.run.legend;
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(Span::styled(
            format!("Map shading: {}", legend.title),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("Dates: {}", legend.date_range_label),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::raw(""));

        if legend.bins.is_empty() {
            lines.push(Line::from(Span::styled(
                "(no data classes)",
                Style::default().fg(Color::Yellow),
            )));
        }
        for bin in &legend.bins {
            let bg = parse_color(&bin.color).unwrap_or(Color::White);
            lines.push(Line::from(vec![
                Span::styled("    ", Style::default().bg(bg)),
                Span::raw(format!(" {}", bin.name)),
            ]));
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Key").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tooltip(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tile = &STATE_TILES[self.selected];
        let by_abbr = self.records_by_abbr();

        let lines: Vec<Line> = match by_abbr.get(tile.abbr) {
            Some(rec) => {
                let tip = crate::report::tooltip(&rec.record);
                let mut lines = vec![Line::from(Span::styled(
                    tip.title,
                    Style::default().add_modifier(Modifier::BOLD),
                ))];
                lines.extend(tip.rows.into_iter().map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
                        Span::raw(value),
                    ])
                }));
                lines
            }
            None => vec![
                Line::from(Span::styled(tile.name, Style::default().add_modifier(Modifier::BOLD))),
                Line::from(Span::styled("No data", Style::default().fg(Color::Gray))),
            ],
        };

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title(tile.abbr).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/↑/↓/→ select state  m toggle absolute/per capita  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Find the nearest tile from `from` stepping in one grid direction.
///
/// Empty grid cells are skipped; returns `None` at the grid edge.
fn neighbor(from: usize, d_row: isize, d_col: isize) -> Option<usize> {
    let start: &StateTile = STATE_TILES.get(from)?;
    let mut row = start.row as isize;
    let mut col = start.col as isize;
    loop {
        row += d_row;
        col += d_col;
        if row < 0 || col < 0 || row >= GRID_ROWS as isize || col >= GRID_COLS as isize {
            return None;
        }
        let hit = STATE_TILES
            .iter()
            .position(|t| t.row as isize == row && t.col as isize == col);
        if hit.is_some() {
            return hit;
        }
    }
}

/// Parse any CSS color token (named, hex, `rgb()`, `hsl()`, ...) to terminal RGB.
///
/// Alpha is composited over white, matching how translucent fills look on a
/// light page.
pub fn parse_color(token: &str) -> Option<Color> {
    let [r, g, b, a] = csscolorparser::parse(token.trim()).ok()?.to_rgba8();
    let alpha = a as f64 / 255.0;
    let over_white = |c: u8| (c as f64 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
    Some(Color::Rgb(over_white(r), over_white(g), over_white(b)))
}

/// Black or white text, whichever reads better on `bg`.
fn text_color_for(bg: Color) -> Color {
    match bg {
        Color::Rgb(r, g, b) => {
            let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            if luma > 140.0 { Color::Black } else { Color::White }
        }
        _ => Color::Black,
    }
}
