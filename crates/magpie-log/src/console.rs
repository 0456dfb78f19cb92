//! Leveled, optionally colorized console backend.
//!
//! [`ConsoleLogger`] writes one line per entry to an injected writer
//! (stderr by default): a local time column, a styled level column and the
//! rendered message. Bare mode drops the columns, leaving the message
//! alone, which keeps test output byte-comparable.

use std::io::{self, IsTerminal, Write};
use std::str::FromStr;
use std::sync::Arc;

use chrono::Local;
use console::Style;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fields::{compose_message, join_values, Arg, FieldSet, Value};
use crate::logger::{Logger, Printer};
use crate::types::Level;

/// When to emit ANSI color codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stderr is a terminal.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl ColorMode {
    fn resolve(self) -> bool {
        match self {
            Self::Auto => io::stderr().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// A line-oriented console logger.
///
/// Derived handles share the writer, so output from a whole handle tree
/// stays interleaved line-by-line rather than byte-by-byte.
#[derive(Clone)]
pub struct ConsoleLogger {
    writer: SharedWriter,
    colored: bool,
    bare: bool,
    min_level: Level,
    fields: FieldSet,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Creates a console logger writing to stderr, colored when stderr is
    /// a terminal, with no level filtering.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(io::stderr()))),
            colored: ColorMode::Auto.resolve(),
            bare: false,
            min_level: Level::Debug,
            fields: FieldSet::new(),
        }
    }

    /// Redirects output to the given writer.
    #[must_use]
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Arc::new(Mutex::new(Box::new(writer)));
        self
    }

    /// Sets the color mode; `Auto` probes stderr at this call.
    #[must_use]
    pub fn with_color(mut self, mode: ColorMode) -> Self {
        self.colored = mode.resolve();
        self
    }

    /// Sets the lowest level that produces output.
    #[must_use]
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Sets the lowest level by name (`"DEBUG"`, `"INFO"`, `"WARN"`,
    /// `"ERROR"`).
    ///
    /// # Panics
    /// Panics on any other name; the level name is part of the call site,
    /// not runtime input.
    #[must_use]
    #[allow(clippy::panic)]
    pub fn with_level_name(self, name: &str) -> Self {
        match Level::from_str(name) {
            Ok(level) => self.with_min_level(level),
            Err(err) => panic!("{err}"),
        }
    }

    /// Drops the time and level columns, emitting the message alone.
    #[must_use]
    pub fn bare(mut self) -> Self {
        self.bare = true;
        self
    }

    fn level_column(&self, level: Level) -> String {
        let name = level.as_str();
        let pad = if name.len() == 4 { " " } else { "" };
        if !self.colored {
            return format!("{name}{pad}");
        }
        let style = match level {
            Level::Debug => Style::new().magenta(),
            Level::Info => Style::new().green(),
            Level::Warn => Style::new().yellow(),
            Level::Error => Style::new().red(),
        }
        .force_styling(true);
        format!("{}{pad}", style.apply_to(name))
    }

    fn write_line(&self, level: Level, message: &str) {
        if !level.is_at_least(self.min_level) {
            return;
        }
        let mut line = String::new();
        if !self.bare {
            line.push_str(&Local::now().format("%H:%M:%S").to_string());
            line.push(' ');
            line.push_str(&self.level_column(level));
            line.push(' ');
        }
        line.push_str(message);
        line.push('\n');

        // Output is best effort; a broken pipe must not fail the caller.
        let mut w = self.writer.lock();
        let _ = w.write_all(line.as_bytes());
    }

    /// Derives a handle sharing the writer, with `args` merged into the
    /// accumulated field set. Malformed input is reported as Error lines.
    #[must_use]
    pub fn derive(&self, args: &[Arg]) -> Self {
        let (fields, malformed) = self.fields.merge_args(args);
        for m in &malformed {
            self.write_line(Level::Error, m.message());
        }
        Self {
            writer: Arc::clone(&self.writer),
            colored: self.colored,
            bare: self.bare,
            min_level: self.min_level,
            fields,
        }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: Level, args: &[Value]) {
        let msg = join_values(args);
        self.write_line(level, &compose_message(&msg, self.fields.render()));
    }

    fn log_fmt(&self, level: Level, args: std::fmt::Arguments<'_>) {
        let mut msg = args.to_string();
        if msg.ends_with('\n') {
            msg.pop();
        }
        self.write_line(level, &compose_message(&msg, self.fields.render()));
    }

    fn log_with(&self, level: Level, msg: &str, args: &[Arg]) {
        let (block, malformed) = self.fields.render_with(args);
        for m in &malformed {
            self.write_line(Level::Error, m.message());
        }
        self.write_line(level, &compose_message(msg, block));
    }

    fn with_fields(&self, args: &[Arg]) -> Arc<dyn Logger> {
        Arc::new(self.derive(args))
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

impl Printer for ConsoleLogger {
    /// Echoes an already-rendered entry, honoring the level threshold.
    fn print(&self, level: Level, message: &str) {
        self.write_line(level, message);
    }

    fn sync(&self) -> Result<()> {
        self.flush()
    }
}
