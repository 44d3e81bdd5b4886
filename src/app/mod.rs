//! Terminal log viewer application
//!
//! Owns the terminal and the UI half of the bridge. The event loop runs on the
//! thread that created the terminal: it polls keys, drains queued log messages
//! into the panel and redraws only when something changed.

mod state;

pub use state::AppState;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};

use crate::config::UiSettings;
use crate::context::LoggingSetup;
use crate::logging::UiBridgeReceiver;
use crate::tui::{render_log_view, Tui};
use crate::workload::WorkloadSummary;

pub struct App {
    pub state: AppState,
    receiver: UiBridgeReceiver,
    tui: Tui,
    stop: Arc<AtomicBool>,
    producer: Option<JoinHandle<WorkloadSummary>>,
}

impl App {
    /// Create the viewer for a terminal logging setup
    pub fn new(setup: LoggingSetup, ui: &UiSettings, stop: Arc<AtomicBool>) -> Result<Self> {
        let receiver = setup
            .receiver
            .ok_or_else(|| anyhow::anyhow!("Terminal viewer needs a bound UI bridge"))?;
        let mut state = AppState::new(setup.logger, ui);
        state.view.log_path = setup.log_path;

        Ok(Self {
            state,
            receiver,
            tui: Tui::new()?,
            stop,
            producer: None,
        })
    }

    /// Producer thread to stop and join when the viewer quits
    pub fn with_producer(mut self, producer: JoinHandle<WorkloadSummary>) -> Self {
        self.producer = Some(producer);
        self
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        tracing::info!("Viewer started");

        let result = self.event_loop();

        self.stop.store(true, Ordering::Relaxed);
        if let Some(producer) = self.producer.take() {
            match producer.join() {
                Ok(summary) => tracing::info!(?summary, "Workload finished"),
                Err(_) => tracing::error!("Workload thread panicked"),
            }
        }

        self.tui.exit()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let tick_rate = Duration::from_millis(50);
        self.state.needs_render = true;

        loop {
            if self.state.needs_render {
                self.render()?;
                self.state.needs_render = false;
            }

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.state.handle_key(key),
                    Event::Resize(_, _) => self.state.needs_render = true,
                    _ => {}
                }
            }

            self.state.drain(&mut self.receiver);

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let state = &self.state;
        self.tui
            .draw(|frame| render_log_view(frame, frame.size(), &state.panel, &state.view))
    }
}
