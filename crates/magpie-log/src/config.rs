//! Logger construction from declarative configuration.
//!
//! [`LoggerConfig`] is a small serde-friendly description of which backend
//! to build and how: development gets a colorized console logger,
//! production gets the structured `tracing` bridge. An environment
//! variable can override the level without touching config files.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::console::{ColorMode, ConsoleLogger};
use crate::error::Result;
use crate::logger::Logger;
use crate::trace::TraceLogger;
use crate::types::Level;

/// Environment variable overriding the configured minimum level.
pub const ENV_LEVEL: &str = "MAGPIE_LOG_LEVEL";

/// Declarative logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Lowest level that produces output.
    pub min_level: Level,
    /// Console color mode; ignored by the structured backend.
    pub color: ColorMode,
    /// Drop the console time and level columns.
    pub bare: bool,
    /// Build the structured `tracing` bridge instead of the console.
    pub structured: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl LoggerConfig {
    /// Verbose console output for local development.
    #[must_use]
    pub fn development() -> Self {
        Self {
            min_level: Level::Debug,
            color: ColorMode::Auto,
            bare: false,
            structured: false,
        }
    }

    /// Structured output at Info level for deployed services.
    #[must_use]
    pub fn production() -> Self {
        Self {
            min_level: Level::Info,
            color: ColorMode::Never,
            bare: false,
            structured: true,
        }
    }

    /// Applies the [`ENV_LEVEL`] override if the variable is set.
    ///
    /// # Errors
    /// Returns [`crate::LogError::InvalidLevel`] when the variable holds
    /// an unknown level name; an unset or non-unicode variable is ignored.
    pub fn from_env(mut self) -> Result<Self> {
        if let Ok(name) = env::var(ENV_LEVEL) {
            self.min_level = Level::from_str(&name)?;
        }
        Ok(self)
    }

    /// Builds the configured backend.
    #[must_use]
    pub fn build(&self) -> Arc<dyn Logger> {
        if self.structured {
            return Arc::new(TraceLogger::new());
        }
        let mut console = ConsoleLogger::new()
            .with_color(self.color)
            .with_min_level(self.min_level);
        if self.bare {
            console = console.bare();
        }
        Arc::new(console)
    }
}
