//! In-memory byte sinks and an injected sink registry.
//!
//! This module provides:
//! - [`MemorySink`] — A shared, cheaply cloneable `io::Write` buffer
//! - [`SinkRegistry`] — A name-to-sink map with no global state
//! - [`ScopedSink`] — A guard that unregisters its sink on drop
//!
//! A `MemorySink` is the natural writer target for the console backend in
//! tests: hand a clone to the logger, read `contents()` in the assertion.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{LogError, Result};

/// A growable in-memory byte buffer behind an `Arc`; clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }

    /// Discards everything written so far.
    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl io::Write for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A registry mapping names to [`MemorySink`] handles.
///
/// Callers inject an `Arc<SinkRegistry>` wherever sinks need to be looked
/// up by name; there is no process-global registry.
#[derive(Debug, Default)]
pub struct SinkRegistry {
    sinks: Mutex<HashMap<String, MemorySink>>,
    counter: AtomicU64,
}

impl SinkRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh sink under `name`.
    ///
    /// # Errors
    /// Returns [`LogError::SinkExists`] if the name is taken.
    pub fn register(&self, name: &str) -> Result<MemorySink> {
        let mut sinks = self.sinks.lock();
        if sinks.contains_key(name) {
            return Err(LogError::SinkExists(name.to_string()));
        }
        let sink = MemorySink::new();
        sinks.insert(name.to_string(), sink.clone());
        Ok(sink)
    }

    /// Looks up a registered sink by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<MemorySink> {
        self.sinks.lock().get(name).cloned()
    }

    /// Removes a sink, returning it if it was registered.
    pub fn unregister(&self, name: &str) -> Option<MemorySink> {
        self.sinks.lock().remove(name)
    }

    /// Returns the number of registered sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    /// Returns true if no sinks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.lock().is_empty()
    }

    /// Registers a sink under a generated `<prefix>-<token>` name and
    /// returns a guard that unregisters it on drop. Tokens are monotonic,
    /// so concurrent callers with the same prefix never collide.
    #[must_use]
    pub fn register_scoped(self: &Arc<Self>, prefix: &str) -> ScopedSink {
        loop {
            let token = self.counter.fetch_add(1, Ordering::Relaxed);
            let name = format!("{prefix}-{token}");
            // A manual register may have taken this name; try the next token.
            if let Ok(sink) = self.register(&name) {
                return ScopedSink {
                    registry: Arc::clone(self),
                    name,
                    sink,
                };
            }
        }
    }
}

/// A registered sink tied to the registry entry's lifetime.
#[derive(Debug)]
pub struct ScopedSink {
    registry: Arc<SinkRegistry>,
    name: String,
    sink: MemorySink,
}

impl ScopedSink {
    /// The generated registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A handle onto the registered sink.
    #[must_use]
    pub fn sink(&self) -> MemorySink {
        self.sink.clone()
    }
}

impl Drop for ScopedSink {
    fn drop(&mut self) {
        self.registry.unregister(&self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn clones_share_the_buffer() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        let _ = writer.write_all(b"hello ");
        let _ = writer.write_all(b"world");
        assert_eq!(sink.contents(), "hello world");
        assert_eq!(sink.len(), 11);
    }

    #[test]
    fn clear_empties_the_buffer() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        let _ = writer.write_all(b"data");
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn register_rejects_duplicates() {
        let registry = SinkRegistry::new();
        assert!(registry.register("a").is_ok());
        let err = registry.register("a");
        assert!(matches!(err, Err(LogError::SinkExists(ref name)) if name == "a"));
    }

    #[test]
    fn get_returns_the_same_buffer() {
        let registry = SinkRegistry::new();
        let sink = match registry.register("shared") {
            Ok(s) => s,
            Err(e) => {
                assert!(false, "register failed: {e}");
                return;
            }
        };
        let mut writer = sink;
        let _ = writer.write_all(b"payload");

        let looked_up = registry.get("shared");
        assert_eq!(looked_up.map(|s| s.contents()), Some("payload".to_string()));
    }

    #[test]
    fn unregister_removes_the_entry() {
        let registry = SinkRegistry::new();
        let _ = registry.register("gone");
        assert!(registry.unregister("gone").is_some());
        assert!(registry.get("gone").is_none());
        assert!(registry.unregister("gone").is_none());
    }

    #[test]
    fn scoped_sinks_get_unique_names() {
        let registry = Arc::new(SinkRegistry::new());
        let a = registry.register_scoped("test");
        let b = registry.register_scoped("test");
        assert_ne!(a.name(), b.name());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn scoped_sink_unregisters_on_drop() {
        let registry = Arc::new(SinkRegistry::new());
        let name = {
            let scoped = registry.register_scoped("temp");
            assert!(registry.get(scoped.name()).is_some());
            scoped.name().to_string()
        };
        assert!(registry.get(&name).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn scoped_generation_skips_taken_names() {
        let registry = Arc::new(SinkRegistry::new());
        let _ = registry.register("x-0");
        let scoped = registry.register_scoped("x");
        assert_ne!(scoped.name(), "x-0");
    }

    #[test]
    fn concurrent_scoped_registration() {
        let registry = Arc::new(SinkRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                let scoped = registry.register_scoped("worker");
                scoped.name().to_string()
            }));
        }
        let names: Vec<String> = handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .collect();
        assert_eq!(names.len(), 8);
        let unique: std::collections::HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), 8, "every scoped name is distinct");
    }
}
