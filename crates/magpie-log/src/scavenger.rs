//! In-memory log-capturing backend for asserting on emitted log content.
//!
//! This module provides [`Scavenger`], a [`Logger`] that renders every
//! call into a [`LogEntry`], appends it to a shared [`EntryStore`], and
//! fans it out to any registered [`Printer`] observers. Handles derived
//! via [`Logger::with_fields`] share the parent's store — messages logged
//! by any descendant are visible from the root — while owning an
//! independent accumulated field set.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::fields::{compose_message, join_values, Arg, FieldSet, Malformed, Value};
use crate::finder::{MessageFinder, SequenceMatch};
use crate::logger::{Logger, Printer};
use crate::store::EntryStore;
use crate::types::{Level, LogEntry};

/// A logger backend that captures every entry in memory for later queries.
///
/// Cloning a `Scavenger` produces another handle onto the same store, as
/// does derivation: field sets stay per-handle, entries are shared.
///
/// ```
/// use magpie_log::{kvs, LoggerExt, Scavenger};
///
/// let sc = Scavenger::new();
/// sc.warn_with("hello", kvs!["foo", 100, "bar", "qux"]);
/// assert!(sc.unique_string_exists("hello\t{\"foo\": 100, \"bar\": \"qux\"}"));
/// ```
#[derive(Clone, Default)]
pub struct Scavenger {
    store: Arc<EntryStore>,
    fields: FieldSet,
    printers: Vec<Arc<dyn Printer>>,
}

impl Scavenger {
    /// Creates a new scavenger with a fresh, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an external observer notified of every recorded entry.
    #[must_use]
    pub fn with_printer(mut self, printer: Arc<dyn Printer>) -> Self {
        self.printers.push(printer);
        self
    }

    /// Derives a new handle sharing this store, with `args` merged into
    /// the accumulated field set. Malformed input is recorded as
    /// diagnostic entries in the shared store.
    #[must_use]
    pub fn derive(&self, args: &[Arg]) -> Self {
        let (fields, malformed) = self.fields.merge_args(args);
        self.record_batch(Self::diagnostics(&malformed));
        Self {
            store: Arc::clone(&self.store),
            fields,
            printers: self.printers.clone(),
        }
    }

    /// Returns a query engine over this scavenger's store.
    #[must_use]
    pub fn finder(&self) -> MessageFinder {
        MessageFinder::new(Arc::clone(&self.store))
    }

    /// Clears all collected entries; every handle sharing the store sees
    /// the effect.
    pub fn reset(&self) {
        self.store.clear();
    }

    /// Returns a snapshot of the collected entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.store.snapshot()
    }

    /// Returns the number of collected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if no entries have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Renders every entry as `"<LEVEL>\t<message>\n"` in store order.
    #[must_use]
    pub fn dump(&self) -> String {
        self.store.dump()
    }

    /// Creates a new, independent scavenger containing only the entries
    /// satisfying the predicate. Mutating the result never affects the
    /// original.
    #[must_use]
    pub fn filter<F: Fn(Level, &str) -> bool>(&self, predicate: F) -> Self {
        let scav = Self::new();
        scav.store.extend(self.store.select(predicate));
        scav
    }

    /// Returns whether any entry contains `substr`.
    #[must_use]
    pub fn string_exists(&self, substr: &str) -> bool {
        !self.finder().find_string(substr).is_empty()
    }

    /// Returns whether exactly one entry contains `substr`.
    #[must_use]
    pub fn unique_string_exists(&self, substr: &str) -> bool {
        self.finder().find_unique_string(substr).is_unique()
    }

    /// Returns whether any entry matches the regular expression.
    #[must_use]
    pub fn regexp_exists(&self, pattern: &str) -> bool {
        !self.finder().find_regexp(pattern).is_empty()
    }

    /// Returns whether exactly one entry matches the regular expression.
    #[must_use]
    pub fn unique_regexp_exists(&self, pattern: &str) -> bool {
        self.finder().find_unique_regexp(pattern).is_unique()
    }

    /// Returns whether any entry matches, with `rex:` prefix dispatch.
    #[must_use]
    pub fn exists(&self, pattern: &str) -> bool {
        !self.finder().find(pattern).is_empty()
    }

    /// Returns whether exactly one entry matches, with `rex:` dispatch.
    #[must_use]
    pub fn unique_exists(&self, pattern: &str) -> bool {
        self.finder().find_unique(pattern).is_unique()
    }

    /// Ordered subsequence search by substring containment.
    #[must_use]
    pub fn find_string_sequence<S: AsRef<str>>(&self, patterns: &[S]) -> SequenceMatch {
        self.finder().find_string_sequence(patterns)
    }

    /// Ordered subsequence search by regex match.
    #[must_use]
    pub fn find_regexp_sequence<S: AsRef<str>>(&self, patterns: &[S]) -> SequenceMatch {
        self.finder().find_regexp_sequence(patterns)
    }

    /// Ordered subsequence search with per-pattern `rex:` dispatch.
    #[must_use]
    pub fn find_sequence<S: AsRef<str>>(&self, patterns: &[S]) -> SequenceMatch {
        self.finder().find_sequence(patterns)
    }

    fn diagnostics(malformed: &[Malformed]) -> Vec<LogEntry> {
        malformed
            .iter()
            .map(|m| LogEntry::new(Level::Error, m.message()))
            .collect()
    }

    /// Appends a batch under one lock acquisition, then fans it out to the
    /// printers with the lock released, so a printer may log back into
    /// this scavenger without deadlocking.
    fn record_batch(&self, batch: Vec<LogEntry>) {
        if batch.is_empty() {
            return;
        }
        self.store.extend(batch.clone());
        for entry in &batch {
            for printer in &self.printers {
                printer.print(entry.level, &entry.message);
            }
        }
    }

    fn record(&self, level: Level, message: String, malformed: &[Malformed]) {
        let mut batch = Self::diagnostics(malformed);
        batch.push(LogEntry::new(level, message));
        self.record_batch(batch);
    }
}

impl Logger for Scavenger {
    fn log(&self, level: Level, args: &[Value]) {
        let msg = join_values(args);
        let message = compose_message(&msg, self.fields.render());
        self.record(level, message, &[]);
    }

    fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        let mut msg = args.to_string();
        if msg.ends_with('\n') {
            msg.pop();
        }
        let message = compose_message(&msg, self.fields.render());
        self.record(level, message, &[]);
    }

    fn log_with(&self, level: Level, msg: &str, args: &[Arg]) {
        let (block, malformed) = self.fields.render_with(args);
        let message = compose_message(msg, block);
        self.record(level, message, &malformed);
    }

    fn with_fields(&self, args: &[Arg]) -> Arc<dyn Logger> {
        Arc::new(self.derive(args))
    }

    fn flush(&self) -> Result<()> {
        let mut first_err = None;
        for printer in &self.printers {
            if let Err(err) = printer.sync() {
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
