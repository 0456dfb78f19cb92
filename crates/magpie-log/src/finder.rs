//! Read-only query engine over a scavenger's captured entries.
//!
//! This module provides:
//! - [`MessageFinder`] — Substring, regex and sequence search
//! - [`Match`] — One matching entry (index + message)
//! - [`UniqueOutcome`] — Exactly-one-match queries
//! - [`SequenceMatch`] — Ordered, non-overlapping subsequence matches
//!
//! Every search is a linear scan over a snapshot of the store — store
//! sizes are test-scale, so no indexing is maintained. A pattern string
//! with the literal prefix `rex:` (optionally followed by whitespace) is
//! compiled as a regular expression; all other strings match by
//! containment. The empty pattern matches only exactly-empty messages.

use regex::Regex;
use std::sync::Arc;

use crate::store::EntryStore;
use crate::types::LogEntry;

/// Prefix marking a pattern string as a regular expression.
pub const REX_PREFIX: &str = "rex:";

/// One matching entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Index of the entry in the store (emission order).
    pub index: usize,
    /// The entry's rendered message.
    pub message: String,
}

/// Outcome of an exactly-one-match query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueOutcome {
    /// No entry matched.
    Missing,
    /// Exactly one entry matched.
    Unique(Match),
    /// Two or more entries matched; the first match is kept for
    /// diagnostics.
    Duplicated(Match),
}

impl UniqueOutcome {
    /// Returns true only for [`UniqueOutcome::Unique`].
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        matches!(self, Self::Unique(_))
    }

    /// Returns the first match, if any entry matched at all.
    #[must_use]
    pub const fn first(&self) -> Option<&Match> {
        match self {
            Self::Missing => None,
            Self::Unique(m) | Self::Duplicated(m) => Some(m),
        }
    }
}

/// Result of an ordered subsequence search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceMatch {
    /// Entry indices satisfying the pattern positions matched so far, in
    /// order; partial when the sequence was not completed.
    pub indices: Vec<usize>,
    /// True when every pattern position was satisfied.
    pub complete: bool,
}

impl SequenceMatch {
    /// Number of pattern positions satisfied.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.indices.len()
    }
}

/// A compiled search pattern: literal containment or regex.
enum Pattern {
    Literal(String),
    Rex(Regex),
}

impl Pattern {
    fn matches(&self, message: &str) -> bool {
        match self {
            Self::Literal(s) if s.is_empty() => message.is_empty(),
            Self::Literal(s) => message.contains(s.as_str()),
            Self::Rex(r) => r.is_match(message),
        }
    }
}

/// Compiles a regex pattern. An invalid pattern is a caller bug.
#[allow(clippy::panic)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern)
        .unwrap_or_else(|err| panic!("invalid regex pattern {pattern:?}: {err}"))
}

/// Applies the `rex:` prefix dispatch to one pattern string.
fn dispatch(pattern: &str) -> Pattern {
    match pattern.strip_prefix(REX_PREFIX) {
        Some(rest) => {
            let trimmed = rest.trim_start();
            if trimmed.is_empty() {
                Pattern::Literal(String::new())
            } else {
                Pattern::Rex(compile(trimmed))
            }
        }
        None => Pattern::Literal(pattern.to_string()),
    }
}

/// Read-only query engine over one entry store.
///
/// The store's lock is taken only long enough to snapshot the entries for
/// each call; the finder never holds it across a scan.
#[derive(Clone)]
pub struct MessageFinder {
    store: Arc<EntryStore>,
}

impl MessageFinder {
    pub(crate) fn new(store: Arc<EntryStore>) -> Self {
        Self { store }
    }

    fn entries(&self) -> Vec<LogEntry> {
        self.store.snapshot()
    }

    fn scan_all(&self, pattern: &Pattern) -> Vec<Match> {
        self.entries()
            .into_iter()
            .enumerate()
            .filter(|(_, e)| pattern.matches(&e.message))
            .map(|(index, e)| Match {
                index,
                message: e.message,
            })
            .collect()
    }

    fn scan_sequence(&self, patterns: &[Pattern]) -> SequenceMatch {
        let mut indices = Vec::new();
        let mut j = 0;
        for (i, e) in self.entries().iter().enumerate() {
            if j >= patterns.len() {
                break;
            }
            if patterns[j].matches(&e.message) {
                indices.push(i);
                j += 1;
            }
        }
        SequenceMatch {
            complete: j == patterns.len(),
            indices,
        }
    }

    fn unique(matches: Vec<Match>) -> UniqueOutcome {
        let mut it = matches.into_iter();
        match (it.next(), it.next()) {
            (None, _) => UniqueOutcome::Missing,
            (Some(m), None) => UniqueOutcome::Unique(m),
            (Some(m), Some(_)) => UniqueOutcome::Duplicated(m),
        }
    }

    /// Finds every entry containing `substr`, in ascending index order.
    /// An empty `substr` matches entries whose message is exactly empty.
    #[must_use]
    pub fn find_string(&self, substr: &str) -> Vec<Match> {
        self.scan_all(&Pattern::Literal(substr.to_string()))
    }

    /// Finds every entry the regex matches somewhere in the message.
    /// An empty pattern behaves like [`MessageFinder::find_string`] with
    /// an empty string. Panics on invalid pattern syntax.
    #[must_use]
    pub fn find_regexp(&self, pattern: &str) -> Vec<Match> {
        if pattern.is_empty() {
            return self.find_string("");
        }
        self.scan_all(&Pattern::Rex(compile(pattern)))
    }

    /// Finds every matching entry, with `rex:` prefix dispatch.
    #[must_use]
    pub fn find(&self, pattern: &str) -> Vec<Match> {
        self.scan_all(&dispatch(pattern))
    }

    /// Requires exactly one entry containing `substr`.
    #[must_use]
    pub fn find_unique_string(&self, substr: &str) -> UniqueOutcome {
        Self::unique(self.find_string(substr))
    }

    /// Requires exactly one entry matching the regex.
    #[must_use]
    pub fn find_unique_regexp(&self, pattern: &str) -> UniqueOutcome {
        Self::unique(self.find_regexp(pattern))
    }

    /// Requires exactly one matching entry, with `rex:` prefix dispatch.
    #[must_use]
    pub fn find_unique(&self, pattern: &str) -> UniqueOutcome {
        Self::unique(self.find(pattern))
    }

    /// Scans for the patterns as an ordered, non-overlapping subsequence
    /// using substring containment: an entry can satisfy at most one
    /// pattern position, positions are satisfied left to right, and there
    /// is no backtracking.
    #[must_use]
    pub fn find_string_sequence<S: AsRef<str>>(&self, patterns: &[S]) -> SequenceMatch {
        let compiled: Vec<Pattern> = patterns
            .iter()
            .map(|p| Pattern::Literal(p.as_ref().to_string()))
            .collect();
        self.scan_sequence(&compiled)
    }

    /// Like [`MessageFinder::find_string_sequence`], with regex matching.
    /// Every pattern is compiled before scanning; invalid syntax panics.
    /// An empty pattern matches only exactly-empty messages.
    #[must_use]
    pub fn find_regexp_sequence<S: AsRef<str>>(&self, patterns: &[S]) -> SequenceMatch {
        let compiled: Vec<Pattern> = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                if p.is_empty() {
                    Pattern::Literal(String::new())
                } else {
                    Pattern::Rex(compile(p))
                }
            })
            .collect();
        self.scan_sequence(&compiled)
    }

    /// Subsequence search with per-pattern `rex:` prefix dispatch, so a
    /// single call can mix literal and regex positions.
    #[must_use]
    pub fn find_sequence<S: AsRef<str>>(&self, patterns: &[S]) -> SequenceMatch {
        let compiled: Vec<Pattern> = patterns.iter().map(|p| dispatch(p.as_ref())).collect();
        self.scan_sequence(&compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;

    fn finder_with(messages: &[(Level, &str)]) -> MessageFinder {
        let store = Arc::new(EntryStore::new());
        for (level, msg) in messages {
            store.append(LogEntry::new(*level, *msg));
        }
        MessageFinder::new(store)
    }

    fn sample() -> MessageFinder {
        finder_with(&[
            (Level::Debug, "hello 1"),
            (Level::Debug, ""),
            (Level::Info, "it is a good day to die"),
            (Level::Warn, "3 world 2"),
            (Level::Error, "foo bar"),
            (Level::Error, ""),
        ])
    }

    #[test]
    fn find_string_returns_all_matches_ascending() {
        let mf = sample();
        let matches = mf.find_string("o");
        let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 2, 3, 4]);
    }

    #[test]
    fn find_string_empty_matches_only_empty_messages() {
        let mf = sample();
        let matches = mf.find_string("");
        let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![1, 5]);
    }

    #[test]
    fn find_regexp_containment() {
        let mf = sample();
        assert_eq!(mf.find_regexp("g.+?d").len(), 1);
        assert_eq!(mf.find_regexp("^it is.+die$").len(), 1);
        assert!(mf.find_regexp("absent").is_empty());
    }

    #[test]
    fn find_regexp_empty_delegates_to_empty_string() {
        let mf = sample();
        assert_eq!(mf.find_regexp(""), mf.find_string(""));
    }

    #[test]
    #[should_panic(expected = "invalid regex pattern")]
    fn find_regexp_invalid_pattern_panics() {
        let mf = sample();
        let _ = mf.find_regexp("[");
    }

    #[test]
    fn rex_prefix_dispatch_equivalence() {
        let mf = sample();
        assert_eq!(mf.find("rex: ^foo.*$"), mf.find_regexp("^foo.*$"));
        assert_eq!(mf.find("hello"), mf.find_string("hello"));
        // prefix with no whitespace after the colon
        assert_eq!(mf.find("rex:fo+ bar"), mf.find_regexp("fo+ bar"));
        // empty remainder behaves as the empty-string pattern
        assert_eq!(mf.find("rex: "), mf.find_string(""));
    }

    #[test]
    fn unique_outcomes() {
        let mf = sample();
        assert!(mf.find_unique_string("good day").is_unique());
        assert!(!mf.find_unique_string("absent").is_unique());
        assert_eq!(mf.find_unique_string("absent"), UniqueOutcome::Missing);

        // two empty messages
        let outcome = mf.find_unique_string("");
        assert!(!outcome.is_unique());
        assert_eq!(outcome.first().map(|m| m.index), Some(1));
    }

    #[test]
    fn unique_regexp_and_dispatch() {
        let mf = sample();
        assert!(mf.find_unique_regexp("wor.d").is_unique());
        assert!(!mf.find_unique_regexp("[o]").is_unique());
        assert!(mf.find_unique("rex: wor.d").is_unique());
        assert!(mf.find_unique("good day").is_unique());
    }

    #[test]
    fn string_sequence_in_order() {
        let mf = sample();
        let m = mf.find_string_sequence(&["hello", "world"]);
        assert!(m.complete);
        assert_eq!(m.indices, vec![0, 3]);
    }

    #[test]
    fn string_sequence_out_of_order_is_partial() {
        let mf = sample();
        let m = mf.find_string_sequence(&["world", "hello"]);
        assert!(!m.complete);
        assert_eq!(m.matched(), 1);
        assert_eq!(m.indices, vec![3]);
    }

    #[test]
    fn string_sequence_with_empty_position() {
        let mf = sample();
        let m = mf.find_string_sequence(&["hello", "", "world"]);
        assert!(m.complete);
        assert_eq!(m.indices, vec![0, 1, 3]);

        let m = mf.find_string_sequence(&["hello", "world", ""]);
        assert!(m.complete);
        assert_eq!(m.indices, vec![0, 3, 5]);
    }

    #[test]
    fn sequence_positions_never_share_an_entry() {
        let mf = finder_with(&[(Level::Info, "a b")]);
        let m = mf.find_string_sequence(&["a", "b"]);
        assert!(!m.complete, "one entry must not satisfy two positions");
        assert_eq!(m.indices, vec![0]);
    }

    #[test]
    fn regexp_sequence() {
        let mf = sample();
        let m = mf.find_regexp_sequence(&["hello \\d+", "it is a good.+"]);
        assert!(m.complete);

        let m = mf.find_regexp_sequence(&["hello \\d+", "fo+ bar", "it is a good.+"]);
        assert!(!m.complete);
        assert_eq!(m.matched(), 2);

        let m = mf.find_regexp_sequence(&["hello \\d+", "", "it is a good.+", ""]);
        assert!(m.complete);
    }

    #[test]
    fn mixed_sequence_dispatch() {
        let mf = sample();
        let m = mf.find_sequence(&["rex: hello \\d+", "it is a good day"]);
        assert!(m.complete);

        let m = mf.find_sequence(&["rex: hello \\d+", "rex: fo+ bar", "it is a good day"]);
        assert!(!m.complete);
        assert_eq!(m.matched(), 2);

        let m = mf.find_sequence(&["rex: hello \\d+", "", "it is a good day", "rex: "]);
        assert!(m.complete);
    }

    #[test]
    fn sequence_on_empty_patterns_is_complete() {
        let mf = sample();
        let m = mf.find_string_sequence::<&str>(&[]);
        assert!(m.complete);
        assert!(m.indices.is_empty());
    }
}
