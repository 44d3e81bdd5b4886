//! Application state for the terminal viewer
//!
//! Everything the event loop mutates lives here, apart from the terminal
//! itself, so key handling and bridge draining work without a real terminal.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::UiSettings;
use crate::logging::{Logger, UiBridgeReceiver};
use crate::tui::{LogPanel, LogViewState};

/// Lines moved by PageUp/PageDown
const PAGE_SIZE: usize = 20;

pub struct AppState {
    pub logger: Arc<Logger>,
    pub panel: LogPanel,
    pub view: LogViewState,
    /// Whether to quit the application
    pub should_quit: bool,
    /// Whether the UI needs to be re-rendered
    pub needs_render: bool,
}

impl AppState {
    pub fn new(logger: Arc<Logger>, ui: &UiSettings) -> Self {
        let view = LogViewState::new(logger.name(), logger.is_debug());
        Self {
            logger,
            panel: LogPanel::new(ui.max_entries, ui.max_alerts),
            view,
            should_quit: false,
            needs_render: true,
        }
    }

    /// Move everything queued on the bridge into the panel
    ///
    /// Returns true if any message arrived.
    pub fn drain(&mut self, receiver: &mut UiBridgeReceiver) -> bool {
        let delivered = receiver.drain(&mut self.panel);
        if delivered > 0 {
            if self.view.auto_scroll {
                self.view.scroll_to_bottom(self.panel.len());
            }
            self.needs_render = true;
        }
        delivered > 0
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let total = self.panel.len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('j') | KeyCode::Down => self.view.scroll_down(1, total),
            KeyCode::Char('k') | KeyCode::Up => self.view.scroll_up(1),
            KeyCode::PageDown => self.view.scroll_down(PAGE_SIZE, total),
            KeyCode::PageUp => self.view.scroll_up(PAGE_SIZE),
            KeyCode::Char('g') | KeyCode::Home => self.view.scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.view.scroll_to_bottom(total),
            KeyCode::Char('d') => {
                let debug_mode = !self.logger.is_debug();
                self.logger.set_debug(debug_mode);
                self.view.debug = debug_mode;
                tracing::info!(debug_mode, "Debug mode toggled");
            }
            KeyCode::Char('c') => self.panel.clear_alerts(),
            _ => return,
        }
        self.needs_render = true;
    }
}
