//! The logger capability contract shared by every backend.
//!
//! This module provides:
//! - [`Logger`] — The core trait (log, derive, flush)
//! - [`LoggerExt`] — Leveled convenience methods, blanket-implemented
//! - [`Printer`] — An external observer of recorded entries

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::fields::{Arg, Value};
use crate::types::Level;

/// The uniform logging capability implemented by every backend: the
/// scavenger, the console writer, the structured bridge and the devourer.
///
/// Backends share no state, only this behavioral contract.
pub trait Logger: Send + Sync {
    /// Logs a space-joined message: the first argument unprefixed, later
    /// arguments separated by single spaces.
    fn log(&self, level: Level, args: &[Value]);

    /// Logs a formatted message; a trailing newline is stripped before the
    /// entry is recorded.
    fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>);

    /// Logs a message with additional key-value context. The per-call
    /// pairs are rendered against the handle's accumulated fields but are
    /// not stored back into the handle.
    fn log_with(&self, level: Level, msg: &str, args: &[Arg]);

    /// Derives a new logger sharing the underlying sink, with the given
    /// key-value pairs merged into the accumulated field set.
    fn with_fields(&self, args: &[Arg]) -> Arc<dyn Logger>;

    /// Flushes any buffered output.
    fn flush(&self) -> Result<()>;
}

/// Leveled convenience methods for any [`Logger`].
pub trait LoggerExt: Logger {
    /// Logs a space-joined message at Debug level.
    fn debug(&self, args: &[Value]) {
        self.log(Level::Debug, args);
    }

    /// Logs a space-joined message at Info level.
    fn info(&self, args: &[Value]) {
        self.log(Level::Info, args);
    }

    /// Logs a space-joined message at Warn level.
    fn warn(&self, args: &[Value]) {
        self.log(Level::Warn, args);
    }

    /// Logs a space-joined message at Error level.
    fn error(&self, args: &[Value]) {
        self.log(Level::Error, args);
    }

    /// Logs a formatted message at Debug level.
    fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Debug, args);
    }

    /// Logs a formatted message at Info level.
    fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Info, args);
    }

    /// Logs a formatted message at Warn level.
    fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Warn, args);
    }

    /// Logs a formatted message at Error level.
    fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(Level::Error, args);
    }

    /// Logs a message with key-value context at Debug level.
    fn debug_with(&self, msg: &str, args: &[Arg]) {
        self.log_with(Level::Debug, msg, args);
    }

    /// Logs a message with key-value context at Info level.
    fn info_with(&self, msg: &str, args: &[Arg]) {
        self.log_with(Level::Info, msg, args);
    }

    /// Logs a message with key-value context at Warn level.
    fn warn_with(&self, msg: &str, args: &[Arg]) {
        self.log_with(Level::Warn, msg, args);
    }

    /// Logs a message with key-value context at Error level.
    fn error_with(&self, msg: &str, args: &[Arg]) {
        self.log_with(Level::Error, msg, args);
    }
}

impl<T: Logger + ?Sized> LoggerExt for T {}

/// An external observer notified of every entry a scavenger records,
/// independent of the entry store itself.
pub trait Printer: Send + Sync {
    /// Called with each recorded entry's level and rendered message.
    fn print(&self, level: Level, message: &str);

    /// Flushes any buffered output held by this printer.
    fn sync(&self) -> Result<()> {
        Ok(())
    }
}
