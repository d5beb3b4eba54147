mod cli;
mod logging;

use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};
use tracing::{info, warn};
use tririse_background::{LoopState, PixelCanvas, TriangleField, color};
use tririse_config::Config;
use tririse_core::{AnimationSpeed, InvalidColorError, Surface};

use crate::cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = cli.load_config()?;

    if cli.save_config {
        let path = config.save(cli.config.as_deref())?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    logging::init(config.log_file.as_deref())?;

    let (columns, rows) = crossterm::terminal::size().wrap_err("failed to query terminal size")?;
    let app = App::new(config, columns, rows)?;

    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// The animation, drawn onto a pixel canvas covering the terminal.
    field: TriangleField<PixelCanvas>,
    /// Colors the `c` key cycles through.
    palette: Vec<String>,
    /// Index of the palette color most recently applied.
    palette_index: usize,
    /// The active base color as the user wrote it.
    color: String,
    /// Current rise speed.
    speed: AnimationSpeed,
    /// Time budget for one frame.
    frame_interval: Duration,
    /// Whether the status line is drawn.
    show_status: bool,
}

impl App {
    /// Construct a new instance of [`App`] for a terminal of `columns` x `rows`.
    pub fn new(config: Config, columns: u16, rows: u16) -> Result<Self, InvalidColorError> {
        let (width, height) = canvas_size(columns, rows, config.show_status);
        let mut field =
            TriangleField::new(PixelCanvas::new(width, height), &config.color, config.density)?;
        field.set_speed(config.speed);

        let palette: Vec<String> = config
            .palette
            .into_iter()
            .filter(|spec| match color::parse_rgb(spec) {
                Ok(_) => true,
                Err(e) => {
                    warn!(error = %e, "ignoring palette entry");
                    false
                }
            })
            .collect();
        // start so that the first `c` press lands on the entry after the
        // current color, or on the first entry when it is not in the palette
        let palette_index = palette
            .iter()
            .position(|spec| *spec == config.color)
            .unwrap_or(palette.len().saturating_sub(1));

        info!(
            color = %config.color,
            density = config.density,
            fps = config.fps,
            speed = %config.speed,
            "tririse starting"
        );

        Ok(Self {
            running: false,
            field,
            palette,
            palette_index,
            color: config.color,
            speed: config.speed,
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(config.fps.max(1))),
            show_status: config.show_status,
        })
    }

    /// Run the application's main loop.
    ///
    /// Each iteration draws one frame, then waits for input until the next
    /// frame is due.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let mut next_frame = Instant::now();
        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            // if drawing fell behind, skip ahead instead of bursting frames
            next_frame = (next_frame + self.frame_interval).max(Instant::now());
            self.handle_crossterm_events(next_frame)?;
        }
        info!("tririse exiting");
        Ok(())
    }

    /// Renders the user interface.
    ///
    /// The status line gets a row of its own below the canvas.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.resize_to(area.width, area.height);

        let (canvas_area, status_area) = if self.show_status {
            let [canvas_area, status_area] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
            (canvas_area, Some(status_area))
        } else {
            (area, None)
        };

        // a stopped field leaves the last frame on the canvas
        self.field.tick();
        frame.render_widget(self.field.surface(), canvas_area);

        if let Some(status_area) = status_area {
            frame.render_widget(self.status_line(), status_area);
        }
    }

    /// Status line: current color, speed, state and key help.
    fn status_line(&self) -> Line<'static> {
        // dark text on light backgrounds and vice versa
        let base = self.field.base_color();
        let text = if base.lightness() > 0.6 {
            Color::Black
        } else {
            Color::White
        };
        let state = match self.field.state() {
            LoopState::Running => "running",
            LoopState::Stopped => "paused",
        };

        Line::from(vec![
            format!(" {} ", self.color).bold().fg(text),
            format!("{} · {}   ", self.speed, state).fg(text),
            "q".bold().fg(text),
            " quit  ".fg(text),
            "c".bold().fg(text),
            " color  ".fg(text),
            "space".bold().fg(text),
            " pause  ".fg(text),
            "+/-".bold().fg(text),
            " speed  ".fg(text),
            "r".bold().fg(text),
            " reset  ".fg(text),
            "h".bold().fg(text),
            " hide".fg(text),
        ])
        .bg(Color::from(base))
        .centered()
    }

    /// Reads crossterm events until `deadline` and updates the state of [`App`].
    fn handle_crossterm_events(&mut self, deadline: Instant) -> color_eyre::Result<()> {
        while self.running {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(columns, rows) => self.resize_to(columns, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('c')) => self.cycle_color(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('r')) => self.field.reset(),
            (_, KeyCode::Char('+') | KeyCode::Char('=')) => self.set_speed(self.speed.next()),
            (_, KeyCode::Char('-')) => self.set_speed(self.speed.prev()),
            (_, KeyCode::Char('h')) => self.toggle_status(),
            _ => {}
        }
    }

    /// Match the canvas to a terminal of `columns` x `rows`, restarting the
    /// animation if the size changed.
    fn resize_to(&mut self, columns: u16, rows: u16) {
        let size = canvas_size(columns, rows, self.show_status);
        if self.field.surface().size() != size {
            self.field.resize(size.0, size.1);
        }
    }

    /// Show or hide the status line. The canvas takes back or gives up the
    /// bottom row on the next frame.
    fn toggle_status(&mut self) {
        self.show_status = !self.show_status;
    }

    /// Switch to the next palette color.
    fn cycle_color(&mut self) {
        if self.palette.is_empty() {
            return;
        }
        self.palette_index = (self.palette_index + 1) % self.palette.len();
        let spec = self.palette[self.palette_index].clone();

        match self.field.change_color(&spec) {
            Ok(()) => {
                info!(color = %spec, "color changed");
                self.color = spec;
            }
            Err(e) => warn!(error = %e, "palette color rejected"),
        }
    }

    /// Stop or resume the animation.
    fn toggle_pause(&mut self) {
        if self.field.is_running() {
            self.field.stop();
        } else {
            self.field.start();
        }
    }

    fn set_speed(&mut self, speed: AnimationSpeed) {
        self.speed = speed;
        self.field.set_speed(speed);
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// Canvas size for a terminal of `columns` x `rows`, leaving the bottom row
/// to the status line when it is shown.
fn canvas_size(columns: u16, rows: u16, show_status: bool) -> (u32, u32) {
    let rows = if show_status {
        rows.saturating_sub(1)
    } else {
        rows
    };
    PixelCanvas::size_for_cells(columns, rows)
}
