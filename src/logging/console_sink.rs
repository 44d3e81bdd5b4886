//! Console sink
//!
//! Writes one human-readable line per record to stdout (or any writer),
//! optionally wrapped in the level's terminal color.

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::style::{style, Color, ResetColor, Stylize};
use crossterm::Command;

use super::error::SinkError;
use super::record::LogRecord;
use super::sink::Sink;

/// Map a level color token to a terminal color
///
/// Unknown tokens yield `None` and the line is written uncolored.
pub fn terminal_color(token: &str) -> Option<Color> {
    match token {
        "grey" | "gray" => Some(Color::Grey),
        "white" => Some(Color::White),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "red" => Some(Color::Red),
        "cyan" => Some(Color::Cyan),
        "magenta" => Some(Color::Magenta),
        "blue" => Some(Color::Blue),
        _ => None,
    }
}

/// Line-oriented sink for a live console
pub struct ConsoleSink {
    use_colors: bool,
    prefix: String,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink {
    /// Colored output to stdout with no prefix
    pub fn new() -> Self {
        Self {
            use_colors: true,
            prefix: String::new(),
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Text placed before every message (e.g. a subsystem tag)
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Redirect output away from stdout
    pub fn with_writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.writer = Mutex::new(writer);
        self
    }

    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Render the line exactly as it will be written, without the newline
    pub fn render(&self, record: &LogRecord) -> String {
        let line = record.format_line_with_prefix(&self.prefix);
        if !self.use_colors {
            return line;
        }
        let Some(color) = terminal_color(record.level().color()) else {
            return line;
        };
        let mut out = style(line.as_str()).with(color).to_string();
        // crossterm drops color codes under NO_COLOR; only reset what was set
        if out != line {
            let _ = ResetColor.write_ansi(&mut out);
        }
        out
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> String {
        "console".to_string()
    }

    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        let line = self.render(record);
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(writer, "{}", line)
            .and_then(|_| writer.flush())
            .map_err(|e| SinkError::io("write console line", "<stdout>", e))
    }
}
