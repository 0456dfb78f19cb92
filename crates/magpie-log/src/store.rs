//! The shared, mutex-guarded backing list of captured log entries.
//!
//! One [`EntryStore`] is created per root scavenger and shared by every
//! handle derived from it; insertion order is emission order.

use parking_lot::Mutex;

use crate::types::{Level, LogEntry};

/// Append-only list of captured entries behind a single mutex.
///
/// The mutex is the sole serialization point for store mutation and
/// enumeration; it is held only for the duration of each append or read.
/// Entries appear in lock-acquisition order when writers race.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Mutex<Vec<LogEntry>>,
}

impl EntryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single entry.
    pub fn append(&self, entry: LogEntry) {
        self.entries.lock().push(entry);
    }

    /// Appends a batch of entries under one lock acquisition, so the batch
    /// is never interleaved with entries from concurrent writers.
    pub fn extend(&self, batch: Vec<LogEntry>) {
        if batch.is_empty() {
            return;
        }
        self.entries.lock().extend(batch);
    }

    /// Returns a defensive copy of all entries, never a live reference.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Returns the current entry count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Renders every entry as `"<LEVEL>\t<message>\n"` in store order.
    #[must_use]
    pub fn dump(&self) -> String {
        let entries = self.entries.lock();
        let mut out = String::new();
        for e in entries.iter() {
            out.push_str(e.level.as_str());
            out.push('\t');
            out.push_str(&e.message);
            out.push('\n');
        }
        out
    }

    /// Applies `f` to each (level, message) pair, collecting the entries
    /// for which it returns true.
    pub(crate) fn select<F: Fn(Level, &str) -> bool>(&self, f: F) -> Vec<LogEntry> {
        let entries = self.entries.lock();
        entries
            .iter()
            .filter(|e| f(e.level, &e.message))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_len() {
        let store = EntryStore::new();
        assert!(store.is_empty());

        store.append(LogEntry::new(Level::Info, "one"));
        store.append(LogEntry::new(Level::Warn, "two"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn extend_preserves_batch_order() {
        let store = EntryStore::new();
        store.extend(vec![
            LogEntry::new(Level::Error, "diag"),
            LogEntry::new(Level::Debug, "primary"),
        ]);

        let snap = store.snapshot();
        assert_eq!(snap[0].message, "diag");
        assert_eq!(snap[1].message, "primary");
    }

    #[test]
    fn snapshot_is_isolated() {
        let store = EntryStore::new();
        store.append(LogEntry::new(Level::Info, "before"));

        let snap = store.snapshot();
        store.append(LogEntry::new(Level::Info, "after"));

        assert_eq!(snap.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn dump_format() {
        let store = EntryStore::new();
        store.append(LogEntry::new(Level::Debug, "1"));
        store.append(LogEntry::new(Level::Error, "boom"));
        assert_eq!(store.dump(), "DEBUG\t1\nERROR\tboom\n");
    }

    #[test]
    fn clear_empties_store() {
        let store = EntryStore::new();
        store.append(LogEntry::new(Level::Info, "x"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.dump(), "");
    }

    #[test]
    fn select_filters_entries() {
        let store = EntryStore::new();
        store.append(LogEntry::new(Level::Info, "keep"));
        store.append(LogEntry::new(Level::Error, "drop"));

        let kept = store.select(|level, _| level == Level::Info);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].message, "keep");
    }
}
