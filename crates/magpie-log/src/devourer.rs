//! Backend that swallows everything.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::fields::{Arg, Value};
use crate::logger::Logger;
use crate::types::Level;

/// A logger that discards every call. Useful as a default when a
/// component requires a logger but the caller wants silence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Devourer;

impl Devourer {
    /// Creates a devourer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Logger for Devourer {
    fn log(&self, _level: Level, _args: &[Value]) {}

    fn log_fmt(&self, _level: Level, _args: fmt::Arguments<'_>) {}

    fn log_with(&self, _level: Level, _msg: &str, _args: &[Arg]) {}

    fn with_fields(&self, _args: &[Arg]) -> Arc<dyn Logger> {
        Arc::new(Self)
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LoggerExt;
    use crate::{kvs, vals};

    #[test]
    fn swallows_everything() {
        let dv = Devourer::new();
        dv.debug(vals!["unseen"]);
        dv.info_fmt(format_args!("{}", 1));
        dv.error_with("msg", kvs!["dangling"]);
        assert!(dv.flush().is_ok());
    }

    #[test]
    fn derivation_yields_another_devourer() {
        let dv = Devourer::new();
        let derived = dv.with_fields(kvs!["k", 1]);
        derived.warn(vals!["still unseen"]);
        assert!(derived.flush().is_ok());
    }
}
