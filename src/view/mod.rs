//! Terminal host for a [`Viewer`] (impure shell).
//!
//! Owns the terminal and the event loop. Each loop iteration polls keys,
//! polls the log file, then calls [`Viewer::tick`] and redraws; one
//! iteration is one "render settled" cycle.

pub mod chunk_view;
pub mod constants;
pub mod status_bar;
pub mod styles;

pub use chunk_view::{ChunkView, DisplayOptions};
pub use status_bar::{status_line, status_text, FollowIndicator};
pub use styles::{ColorConfig, LogStyles};

use crate::integration;
use crate::model::{AppError, InputError};
use crate::source::{LogFileSource, SourceUpdate};
use crate::viewer::Viewer;
use crate::virtual_list::ItemSizeEstimator;
use constants::{FALLBACK_PAGE_ROWS, STATUS_BAR_HEIGHT, TICK_INTERVAL};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Event loop settings.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// How long to wait for input before polling the file and ticking.
    pub tick_interval: Duration,
    /// Color output.
    pub colors: ColorConfig,
    /// Gutter columns.
    pub display: DisplayOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            colors: ColorConfig::from_env_and_args(false),
            display: DisplayOptions::default(),
        }
    }
}

/// Viewer plus terminal.
///
/// Generic over backend to support testing with `TestBackend`.
pub struct TuiApp<B: Backend> {
    terminal: Terminal<B>,
    viewer: Viewer,
    source: Option<LogFileSource>,
    styles: LogStyles,
    display: DisplayOptions,
}

impl<B: Backend> TuiApp<B> {
    /// Wrap a terminal and viewer; `source` is polled for appended lines.
    pub fn new(
        terminal: Terminal<B>,
        viewer: Viewer,
        source: Option<LogFileSource>,
        styles: LogStyles,
        display: DisplayOptions,
    ) -> Self {
        Self {
            terminal,
            viewer,
            source,
            styles,
            display,
        }
    }

    /// The hosted viewer.
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Run until the user quits.
    ///
    /// # Errors
    ///
    /// Terminal I/O failures and log file read failures are fatal.
    pub fn run(&mut self, options: &RunOptions) -> Result<(), AppError> {
        self.draw()?;

        loop {
            if event::poll(options.tick_interval)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            info!("Quit requested");
                            return Ok(());
                        }
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "Terminal resized");
                    }
                    _ => {}
                }
            }

            self.poll_source()?;
            self.viewer.tick();
            self.draw()?;
        }
    }

    /// Handle one key press. Returns `true` if the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let page = self.page_rows();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.viewer.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.viewer.scroll_by(1),
            KeyCode::PageUp => self.viewer.scroll_by(-page),
            KeyCode::PageDown => self.viewer.scroll_by(page),
            KeyCode::Home | KeyCode::Char('g') => self.viewer.on_scroll(0),
            KeyCode::End | KeyCode::Char('f') | KeyCode::Char('G') => self.viewer.request_follow(),
            KeyCode::Enter => {
                if let Some(line) = self.viewer.top_visible_line() {
                    self.viewer.select_line(line);
                }
            }
            _ => {}
        }
        false
    }

    /// Read newly appended lines and feed them to the viewer.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the file cannot be read.
    pub fn poll_source(&mut self) -> Result<(), InputError> {
        let Some(source) = self.source.as_mut() else {
            return Ok(());
        };

        let first_source_line = source.next_source_line();
        match source.poll()? {
            SourceUpdate::Appended(lines) if lines.is_empty() => {}
            SourceUpdate::Appended(lines) => {
                let (entries, malformed) = integration::process_lines(lines, first_source_line);
                let outcome = self.viewer.append(entries);
                if !malformed.is_empty() || !outcome.skipped.is_empty() {
                    warn!(
                        unparseable = malformed.len(),
                        out_of_order = outcome.skipped.len(),
                        "Skipped malformed lines while tailing"
                    );
                }
            }
            SourceUpdate::Reset(lines) => {
                let (entries, _) = integration::process_lines(lines, 1);
                self.viewer.replace_all(entries);
            }
        }
        Ok(())
    }

    /// Render the current frame.
    pub fn draw(&mut self) -> io::Result<()> {
        let size = self.terminal.size()?;
        let [content, status] = split_area(Rect::new(0, 0, size.width, size.height));
        self.sync_viewport(content);

        let viewer = &self.viewer;
        let styles = self.styles;
        let display = self.display;
        self.terminal.draw(|frame| {
            frame.render_widget(
                ChunkView::new(viewer).styles(styles).display(display),
                content,
            );
            frame.render_widget(status_line(viewer, &styles), status);
        })?;
        Ok(())
    }

    fn sync_viewport(&mut self, content: Rect) {
        self.viewer.on_resize(usize::from(content.height));
        if let ItemSizeEstimator::Wrapped { .. } = self.viewer.estimator() {
            let gutter = u16::try_from(self.display.gutter_width()).unwrap_or(u16::MAX);
            let text_width = content.width.saturating_sub(gutter).max(1);
            self.viewer.set_wrap_width(text_width);
        }
    }

    fn page_rows(&self) -> isize {
        let height = self.viewer.viewport().height;
        let rows = if height == 0 { FALLBACK_PAGE_ROWS } else { height };
        isize::try_from(rows).unwrap_or(isize::MAX)
    }
}

fn split_area(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_BAR_HEIGHT)]).areas(area)
}

/// Set up the terminal, run the viewer, and restore the terminal.
///
/// Logging must be initialized by the caller.
///
/// # Errors
///
/// Returns the first fatal error; the terminal is restored either way.
pub fn run(
    viewer: Viewer,
    source: Option<LogFileSource>,
    options: RunOptions,
) -> Result<(), AppError> {
    let terminal = setup_terminal()?;
    let styles = LogStyles::with_color_config(options.colors);
    let mut app = TuiApp::new(terminal, viewer, source, styles, options.display);

    let result = app.run(&options);

    restore_terminal()?;
    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Restore terminal to normal state.
///
/// Disables raw mode and leaves the alternate screen.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
