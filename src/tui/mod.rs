//! Terminal UI module
//!
//! Terminal setup and teardown plus the log viewer drawn with Ratatui.

pub mod log_panel;
pub mod view;

pub use log_panel::{LogPanel, PanelEntry};
pub use view::{render_log_view, token_color, LogViewState};

use anyhow::Result;
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{self, stdout};

/// Terminal UI wrapper
///
/// Handles terminal setup, teardown, and provides the rendering surface.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    entered: bool,
}

/// Error handler for terminal cleanup operations
enum ErrorHandler {
    /// Log errors via tracing (normal exit)
    Tracing,
    /// Print errors to stderr (panic/drop, tracing may be unavailable)
    Stderr,
}

impl ErrorHandler {
    fn handle(&self, context: &str, error: impl std::fmt::Display) {
        match self {
            ErrorHandler::Tracing => tracing::warn!("{}: {}", context, error),
            ErrorHandler::Stderr => eprintln!("TUI teardown: {}: {}", context, error),
        }
    }
}

/// Switch to raw mode, then the alternate screen
///
/// `entered` is set as soon as raw mode is on, so a failure switching screens
/// still leaves Drop responsible for restoring the terminal.
fn enter_terminal<R, A>(entered: &mut bool, raw_mode: R, alternate_screen: A) -> io::Result<()>
where
    R: FnOnce() -> io::Result<()>,
    A: FnOnce() -> io::Result<()>,
{
    raw_mode()?;
    *entered = true;
    alternate_screen()
}

impl Tui {
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }

    /// Enter TUI mode (raw mode + alternate screen)
    pub fn enter(&mut self) -> Result<()> {
        enter_terminal(
            &mut self.entered,
            enable_raw_mode,
            || stdout().execute(EnterAlternateScreen).map(|_| ()),
        )?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Exit TUI mode (restore terminal)
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.restore(ErrorHandler::Tracing);
        self.entered = false;
        tracing::debug!("TUI exit sequence completed");
        Ok(())
    }

    fn restore(&mut self, handler: ErrorHandler) {
        if let Err(e) = self.terminal.show_cursor() {
            handler.handle("failed to show cursor", e);
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            handler.handle("failed to leave alternate screen", e);
        }
        if let Err(e) = disable_raw_mode() {
            handler.handle("failed to disable raw mode", e);
        }
    }

    /// Draw a frame
    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // tracing may already be torn down here
        if self.entered {
            self.restore(ErrorHandler::Stderr);
        }
    }
}
