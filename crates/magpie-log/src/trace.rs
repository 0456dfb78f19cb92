//! Bridge backend forwarding rendered lines into the `tracing` ecosystem.
//!
//! [`TraceLogger`] renders messages and field blocks exactly like the
//! other backends, then hands the finished line to the active `tracing`
//! subscriber. Output shape, filtering and shipping are the subscriber's
//! concern.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::fields::{compose_message, join_values, Arg, FieldSet, Value};
use crate::logger::Logger;
use crate::types::Level;

/// A logger that emits through `tracing` events.
#[derive(Debug, Clone, Default)]
pub struct TraceLogger {
    fields: FieldSet,
}

impl TraceLogger {
    /// Creates a trace logger with no accumulated fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!("{message}"),
            Level::Info => tracing::info!("{message}"),
            Level::Warn => tracing::warn!("{message}"),
            Level::Error => tracing::error!("{message}"),
        }
    }

    /// Derives a handle with `args` merged into the accumulated field set.
    /// Malformed input is reported as error events.
    #[must_use]
    pub fn derive(&self, args: &[Arg]) -> Self {
        let (fields, malformed) = self.fields.merge_args(args);
        for m in &malformed {
            Self::emit(Level::Error, m.message());
        }
        Self { fields }
    }
}

impl Logger for TraceLogger {
    fn log(&self, level: Level, args: &[Value]) {
        let msg = join_values(args);
        Self::emit(level, &compose_message(&msg, self.fields.render()));
    }

    fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        let mut msg = args.to_string();
        if msg.ends_with('\n') {
            msg.pop();
        }
        Self::emit(level, &compose_message(&msg, self.fields.render()));
    }

    fn log_with(&self, level: Level, msg: &str, args: &[Arg]) {
        let (block, malformed) = self.fields.render_with(args);
        for m in &malformed {
            Self::emit(Level::Error, m.message());
        }
        Self::emit(level, &compose_message(msg, block));
    }

    fn with_fields(&self, args: &[Arg]) -> Arc<dyn Logger> {
        Arc::new(self.derive(args))
    }

    /// The subscriber owns buffering; nothing to flush here.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
