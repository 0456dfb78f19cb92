//! # magpie-log
//!
//! Structured-logging facade with an in-memory capture backend for
//! asserting on log output.
//!
//! This crate provides:
//!
//! - [`Logger`] / [`LoggerExt`] — The backend-agnostic logging contract
//! - [`Scavenger`] — Captures entries in memory for test assertions
//! - [`MessageFinder`] — Substring, regex, unique and sequence queries
//! - [`ConsoleLogger`] — Leveled, optionally colorized console output
//! - [`TraceLogger`] — Bridge into the `tracing` ecosystem
//! - [`Devourer`] — Discards everything
//! - [`MemorySink`] / [`SinkRegistry`] — Capturable writer targets
//! - [`LoggerConfig`] — Declarative backend construction
//!
//! ## Example
//!
//! ```rust
//! use magpie_log::{kvs, vals, LoggerExt, Scavenger};
//!
//! let sc = Scavenger::new();
//! let api = sc.derive(kvs!["svc", "api"]);
//!
//! api.info(vals!["listening on", 8080]);
//! api.warn_with("slow request", kvs!["ms", 1500]);
//!
//! assert!(sc.string_exists("listening on 8080"));
//! assert!(sc.unique_exists(r"rex: slow request\t"));
//! assert_eq!(sc.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod console;
pub mod devourer;
pub mod error;
pub mod fields;
pub mod finder;
pub mod logger;
pub mod scavenger;
pub mod sink;
pub mod store;
pub mod trace;
pub mod types;

// Re-export main types
pub use config::{LoggerConfig, ENV_LEVEL};
pub use console::{ColorMode, ConsoleLogger};
pub use devourer::Devourer;
pub use error::{LogError, Result};
pub use fields::{Arg, Field, FieldSet, Malformed, Value};
pub use finder::{Match, MessageFinder, SequenceMatch, UniqueOutcome};
pub use logger::{Logger, LoggerExt, Printer};
pub use scavenger::Scavenger;
pub use sink::{MemorySink, ScopedSink, SinkRegistry};
pub use store::EntryStore;
pub use trace::TraceLogger;
pub use types::{Level, LogEntry};
