//! Log viewer rendering
//!
//! Header, colored entry list with scrollbar, status bar and footer.

use std::path::PathBuf;

use ratatui::prelude::*;
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use super::log_panel::LogPanel;

/// Map a level color token to a ratatui color
pub fn token_color(token: &str) -> Color {
    match token {
        "grey" => Color::Gray,
        "white" => Color::White,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "red" => Color::Red,
        "cyan" => Color::Cyan,
        "magenta" => Color::Magenta,
        _ => Color::Reset,
    }
}

/// Scroll position and labels for the viewer
#[derive(Debug, Clone)]
pub struct LogViewState {
    pub logger_name: String,
    pub debug: bool,
    pub log_path: Option<PathBuf>,
    pub scroll_offset: usize,
    pub auto_scroll: bool,
}

impl LogViewState {
    pub fn new(logger_name: impl Into<String>, debug: bool) -> Self {
        Self {
            logger_name: logger_name.into(),
            debug,
            log_path: None,
            scroll_offset: 0,
            auto_scroll: true,
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize, total: usize) {
        self.scroll_offset = (self.scroll_offset + lines).min(total.saturating_sub(1));
        if self.scroll_offset + 1 >= total {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self, total: usize) {
        self.auto_scroll = true;
        self.scroll_offset = total.saturating_sub(1);
    }

    /// First visible entry for a viewport of `visible_height` rows
    pub fn effective_scroll(&self, total: usize, visible_height: usize) -> usize {
        if self.auto_scroll && total > visible_height {
            total - visible_height
        } else {
            self.scroll_offset
                .min(total.saturating_sub(visible_height.max(1)))
        }
    }
}

/// Render the whole log viewer into `area`
pub fn render_log_view(frame: &mut Frame, area: Rect, panel: &LogPanel, state: &LogViewState) {
    let [header_area, content_area, status_area, footer_area] = {
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(area);
        [chunks[0], chunks[1], chunks[2], chunks[3]]
    };

    render_header(frame, header_area, panel, state);
    render_entries(frame, content_area, panel, state);
    render_status(frame, status_area, panel);

    let footer = Paragraph::new(
        "↑/k ↓/j: scroll | g: top | G: bottom (auto) | d: debug | c: clear alerts | q/Esc: quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect, panel: &LogPanel, state: &LogViewState) {
    let mut spans = vec![
        Span::styled("fanlog", Style::default().fg(Color::Cyan).bold()),
        Span::raw(format!(" > {} ", state.logger_name)),
        Span::styled(
            format!("({} entries", panel.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if state.auto_scroll {
        spans.push(Span::styled(" [auto-scroll]", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::styled(")", Style::default().fg(Color::DarkGray)));
    if state.debug {
        spans.push(Span::styled(" DEBUG", Style::default().fg(Color::Gray).bold()));
    }
    if panel.alert_count() > 0 {
        spans.push(Span::styled(
            format!(" ⚠ {}", panel.alert_count()),
            Style::default().fg(Color::Yellow).bold(),
        ));
    }
    if let Some(path) = &state.log_path {
        spans.push(Span::styled(
            format!(" - {}", path.display()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_entries(frame: &mut Frame, area: Rect, panel: &LogPanel, state: &LogViewState) {
    let total = panel.len();
    let visible_height = area.height.saturating_sub(2) as usize;

    if total == 0 {
        let empty = Paragraph::new("No log entries yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Logs"));
        frame.render_widget(empty, area);
        return;
    }

    let scroll = state.effective_scroll(total, visible_height);
    let items: Vec<ListItem> = panel
        .entries()
        .skip(scroll)
        .take(visible_height)
        .map(|entry| {
            let color = token_color(entry.level.color());
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<8} ", entry.level.as_str()),
                    Style::default().fg(color).bold(),
                ),
                Span::styled(entry.message.as_str(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let shown = items.len();
    let title = format!("Logs [{}-{} of {}]", scroll + 1, scroll + shown, total);
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);

    if total > visible_height && area.width > 1 {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(total)
            .position(scroll)
            .viewport_content_length(visible_height);
        let scrollbar_area = Rect {
            x: area.x + area.width - 1,
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

fn render_status(frame: &mut Frame, area: Rect, panel: &LogPanel) {
    let mut spans = Vec::new();
    if let Some(progress) = panel.latest_progress() {
        spans.push(Span::styled(
            format!("⟳ {}", progress),
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(status) = panel.latest_status() {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(status, Style::default().fg(Color::Magenta)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogDisplay, LogLevel};
    use ratatui::backend::TestBackend;

    #[test]
    fn test_token_color_covers_every_level() {
        for level in LogLevel::ALL {
            assert_ne!(token_color(level.color()), Color::Reset, "{}", level);
        }
        assert_eq!(token_color("chartreuse"), Color::Reset);
    }

    #[test]
    fn test_effective_scroll_follows_tail() {
        let state = LogViewState::new("app", false);
        assert_eq!(state.effective_scroll(100, 10), 90);
        assert_eq!(state.effective_scroll(5, 10), 0);
    }

    #[test]
    fn test_manual_scroll_disables_auto() {
        let mut state = LogViewState::new("app", false);
        state.scroll_to_bottom(50);
        state.scroll_up(5);
        assert!(!state.auto_scroll);
        assert_eq!(state.scroll_offset, 44);

        state.scroll_down(100, 50);
        assert!(state.auto_scroll);
    }

    #[test]
    fn test_render_shows_entries_and_status() {
        let mut panel = LogPanel::new(100, 10);
        panel.info("starting crawl").unwrap();
        panel.warning("slow response").unwrap();
        panel.status_notice("3/10 pages").unwrap();

        let state = LogViewState::new("scraper", true);
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        terminal
            .draw(|frame| render_log_view(frame, frame.size(), &panel, &state))
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("scraper"));
        assert!(text.contains("starting crawl"));
        assert!(text.contains("WARNING"));
        assert!(text.contains("3/10 pages"));
    }
}
