//! Terminal view of the cell grid.
//!
//! Pure read-side collaborator: every frame samples the cells' lock-free
//! accessors and paints one 4x2 tile per cell, background-colored by
//! energy. The network itself is never touched from here.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use germ_core::Energy;
use germ_world::Cell;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const DRAW_INTERVAL: Duration = Duration::from_millis(10);
const TILE_WIDTH: u16 = 4;
const TILE_HEIGHT: u16 = 2;
const GRID_MARGIN_X: u16 = 2;
const GRID_MARGIN_Y: u16 = 1;

/// Run the interactive view until the user quits (q, Esc or Enter).
pub fn run(cells: &[Arc<Cell>], cols: usize) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to build terminal backend")?;
    terminal.hide_cursor().ok();

    let result = event_loop(&mut terminal, cells, cols);

    terminal.show_cursor().ok();
    if let Err(err) = disable_raw_mode() {
        tracing::error!(?err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        tracing::error!(?err, "failed to leave alternate screen");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cells: &[Arc<Cell>],
    cols: usize,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw_grid(frame, cells, cols))?;

        if event::poll(DRAW_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc | KeyCode::Enter => {
                        break;
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break;
                    }
                    _ => {}
                },
                Event::Resize(_, _) => {
                    terminal.clear()?;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn draw_grid(frame: &mut Frame, cells: &[Arc<Cell>], cols: usize) {
    let area = frame.area();

    for (i, cell) in cells.iter().enumerate() {
        let (x, y) = tile_origin(i, cols);
        if x + TILE_WIDTH > area.width || y + TILE_HEIGHT > area.height {
            continue; // clipped at the current terminal size
        }

        let energy = cell.energy();
        let tile = Paragraph::new(vec![
            Line::from(format!("{:>4}", energy)),
            Line::from(format!(" {:>2}", cell.cycle_period().as_millis())),
        ])
        .style(Style::default().fg(Color::White).bg(energy_color(energy)));

        frame.render_widget(tile, Rect::new(x, y, TILE_WIDTH, TILE_HEIGHT));
    }
}

/// Top-left corner of the tile for the cell at `index`.
fn tile_origin(index: usize, cols: usize) -> (u16, u16) {
    let col = (index % cols) as u16;
    let row = (index / cols) as u16;
    (
        GRID_MARGIN_X + col * TILE_WIDTH,
        GRID_MARGIN_Y + row * TILE_HEIGHT,
    )
}

/// Piecewise-linear energy ramp: yellow fading to turquoise below 100,
/// blue to pink below 2000, pink to red below 4000, solid red above.
fn energy_color(e: Energy) -> Color {
    let v = e.min(i64::MAX as u64) as i64;
    let (r, g, b) = if v < 100 {
        ((100 - v) * 200 / 100, (100 - v) * 55 / 100 + 200, v * 255 / 100)
    } else if v < 2000 {
        ((v - 100) * 255 / 1900, 0, 255)
    } else if v < 4000 {
        (255, 0, (4000 - v) * 255 / 2000)
    } else {
        (255, 0, 0)
    };
    Color::Rgb(r as u8, g as u8, b as u8)
}

/// Sample the same snapshot loop without a terminal, then log a summary.
/// Useful for CI and smoke runs where no tty is available.
pub fn run_headless(cells: &[Arc<Cell>], frames: usize) -> Result<()> {
    let mut min_energy = Energy::MAX;
    let mut max_energy = Energy::MIN;

    for _ in 0..frames {
        std::thread::sleep(DRAW_INTERVAL);
        for cell in cells {
            let energy = cell.energy();
            min_energy = min_energy.min(energy);
            max_energy = max_energy.max(energy);
        }
    }

    let total: Energy = cells.iter().map(|c| c.energy()).sum();
    info!(
        frames,
        cells = cells.len(),
        min_energy,
        max_energy,
        total_energy = total,
        "headless run completed"
    );
    Ok(())
}
