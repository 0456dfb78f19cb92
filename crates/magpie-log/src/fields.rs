//! Field canonicalization shared by every backend.
//!
//! This module provides:
//! - [`Value`] — A loosely-typed logging argument
//! - [`Field`] — A pre-typed key-value pair
//! - [`Arg`] — One element of a flat key-value argument list
//! - [`FieldSet`] — A canonical, sorted, deduplicated field mapping
//! - [`Malformed`] — Diagnostics for odd-length or non-string-key input
//!
//! The canonical rendering of a [`FieldSet`] is `{"k1": v1, "k2": v2}` with
//! keys sorted ascending, string values JSON-quoted and numeric/bool values
//! bare. Rendering depends only on the final key set and values, never on
//! insertion order.

use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

/// A loosely-typed argument value.
///
/// Conversions exist for the common primitive types; anything else goes
/// through [`Value::encode`], which JSON-encodes the value and degrades to
/// a debug rendering when encoding fails. No constructor panics.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string, JSON-quoted in field blocks
    Str(String),
    /// A signed integer, rendered bare
    Int(i64),
    /// An unsigned integer, rendered bare
    Uint(u64),
    /// A float, rendered bare
    Float(f64),
    /// A boolean, rendered bare
    Bool(bool),
    /// A pointer-sized address, rendered as bare hex
    Addr(usize),
    /// A structured value, rendered as compact JSON
    Json(serde_json::Value),
    /// Preformatted text, emitted verbatim in field blocks
    Raw(String),
}

impl Value {
    /// Encodes an arbitrary serializable value.
    ///
    /// Falls back to the value's debug representation when JSON encoding
    /// fails (unsupported map keys, excessive depth), so no logging call
    /// ever fails due to argument content.
    pub fn encode<T: Serialize + fmt::Debug>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Self::Json(v),
            Err(_) => Self::Raw(format!("{value:?}")),
        }
    }

    /// Wraps a pointer-sized address, rendered as `0x`-prefixed hex.
    #[must_use]
    pub const fn addr(addr: usize) -> Self {
        Self::Addr(addr)
    }

    /// Serializes this value into its canonical field-block form.
    ///
    /// Strings are quoted with standard JSON escaping; numbers, bools and
    /// addresses are bare; structured values are compact JSON.
    #[must_use]
    pub fn stringify(&self) -> String {
        match self {
            Self::Str(s) => serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}")),
            Self::Int(i) => i.to_string(),
            Self::Uint(u) => u.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Addr(a) => format!("{a:#x}"),
            Self::Json(v) => serde_json::to_string(v).unwrap_or_else(|_| format!("{v}")),
            Self::Raw(s) => s.clone(),
        }
    }

    /// Returns true if this value is a string.
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }
}

impl fmt::Display for Value {
    /// Plain rendering, used for space-joined messages: strings unquoted,
    /// everything else as in [`Value::stringify`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) | Self::Raw(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Uint(u) => write!(f, "{u}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Addr(a) => write!(f, "{a:#x}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

/// A pre-typed key-value pair, consumed as a single argument-list element.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field key
    pub key: String,
    /// Field value
    pub value: Value,
}

impl Field {
    /// Creates a new typed field.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One element of a flat key-value argument list: either a loose value
/// (keys at even positions, values at odd positions) or a pre-typed field.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A loose value
    Value(Value),
    /// A pre-typed key-value pair
    Field(Field),
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<Field> for Arg {
    fn from(f: Field) -> Self {
        Self::Field(f)
    }
}

macro_rules! value_conversions {
    ($($ty:ty => $build:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[allow(clippy::redundant_closure_call)]
                fn from(v: $ty) -> Self {
                    ($build)(v)
                }
            }

            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Self::Value(Value::from(v))
                }
            }
        )*
    };
}

value_conversions! {
    bool => Value::Bool,
    i8 => |v| Value::Int(i64::from(v)),
    i16 => |v| Value::Int(i64::from(v)),
    i32 => |v| Value::Int(i64::from(v)),
    i64 => Value::Int,
    u8 => |v| Value::Uint(u64::from(v)),
    u16 => |v| Value::Uint(u64::from(v)),
    u32 => |v| Value::Uint(u64::from(v)),
    u64 => Value::Uint,
    f32 => |v| Value::Float(f64::from(v)),
    f64 => Value::Float,
    &str => |v: &str| Value::Str(v.to_string()),
    String => Value::Str,
    serde_json::Value => Value::Json,
}

/// Builds a `&[Value]` from a comma-separated list of convertible values.
///
/// ```
/// use magpie_log::vals;
///
/// let args = vals!["answer", 42, true];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! vals {
    ($($v:expr),* $(,)?) => {
        &[$($crate::Value::from($v)),*][..]
    };
}

/// Builds a `&[Arg]` key-value argument list.
///
/// ```
/// use magpie_log::kvs;
///
/// let args = kvs!["foo", 100, "bar", "qux"];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! kvs {
    ($($v:expr),* $(,)?) => {
        &[$($crate::Arg::from($v)),*][..]
    };
}

/// Malformed key-value input detected while consuming an argument list.
///
/// These are diagnostics, not errors: the calling backend records each one
/// as a synthetic Error-level entry so the anomaly is visible in test
/// assertions instead of crashing the logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// The argument list ended with an unpaired key.
    DanglingKey,
    /// One or more key positions held a non-string value.
    NonStringKey,
}

impl Malformed {
    /// The diagnostic message recorded for this malformation.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::DanglingKey => "Ignored key without a value.",
            Self::NonStringKey => "Ignored key-value pairs with non-string keys.",
        }
    }
}

/// A canonical field mapping: key to serialized value string, sorted by key.
///
/// Merging is last-occurrence-wins; handles derived from a logger own an
/// immutable copy, so no locking is ever needed for field access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    entries: BTreeMap<String, String>,
}

impl FieldSet {
    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the serialized value for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Consumes a flat argument list left to right into (key, serialized
    /// value) pairs.
    ///
    /// A [`Field`] consumes one slot; a string value at a key position
    /// consumes itself plus the following value. A non-string key skips
    /// that key and its value; a dangling final key is dropped. Each
    /// malformation category is reported at most once, in order of first
    /// occurrence.
    fn consume(args: &[Arg]) -> (Vec<(String, String)>, Vec<Malformed>) {
        let mut pairs = Vec::new();
        let mut malformed: Vec<Malformed> = Vec::new();
        let mut report = |list: &mut Vec<Malformed>, m: Malformed| {
            if !list.contains(&m) {
                list.push(m);
            }
        };

        let mut i = 0;
        while i < args.len() {
            match &args[i] {
                Arg::Field(f) => {
                    pairs.push((f.key.clone(), f.value.stringify()));
                    i += 1;
                }
                Arg::Value(key) => {
                    if i + 1 >= args.len() {
                        report(&mut malformed, Malformed::DanglingKey);
                        break;
                    }
                    let rendered = match &args[i + 1] {
                        Arg::Value(v) => v.stringify(),
                        Arg::Field(f) => f.value.stringify(),
                    };
                    if let Value::Str(k) = key {
                        pairs.push((k.clone(), rendered));
                    } else {
                        report(&mut malformed, Malformed::NonStringKey);
                    }
                    i += 2;
                }
            }
        }

        (pairs, malformed)
    }

    /// Merges an argument list into this set, producing a new set.
    ///
    /// Later pairs overwrite earlier same-key pairs; the result renders
    /// sorted by key. The receiver is unchanged.
    #[must_use]
    pub fn merge_args(&self, args: &[Arg]) -> (Self, Vec<Malformed>) {
        let (pairs, malformed) = Self::consume(args);
        let mut entries = self.entries.clone();
        for (k, v) in pairs {
            entries.insert(k, v);
        }
        (Self { entries }, malformed)
    }

    /// Renders the canonical `{"k1": v1, "k2": v2}` block, or `None` when
    /// the set is empty.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(k, v)| format_pair(k, v))
            .collect();
        Some(format!("{{{}}}", parts.join(", ")))
    }

    /// Renders this set together with per-call arguments, without storing
    /// the per-call pairs back.
    ///
    /// The accumulated fields come first, sorted; per-call pairs follow in
    /// first-occurrence order with last-write-wins among themselves. A
    /// per-call key suppresses any accumulated entry with the same key.
    #[must_use]
    pub fn render_with(&self, args: &[Arg]) -> (Option<String>, Vec<Malformed>) {
        let (pairs, malformed) = Self::consume(args);
        if pairs.is_empty() {
            return (self.render(), malformed);
        }

        let mut order: Vec<&str> = Vec::new();
        let mut latest: HashMap<&str, &str> = HashMap::new();
        for (k, v) in &pairs {
            if !latest.contains_key(k.as_str()) {
                order.push(k);
            }
            latest.insert(k, v);
        }

        let mut parts = Vec::new();
        for (k, v) in &self.entries {
            if !latest.contains_key(k.as_str()) {
                parts.push(format_pair(k, v));
            }
        }
        for k in order {
            if let Some(v) = latest.get(k) {
                parts.push(format_pair(k, v));
            }
        }

        (Some(format!("{{{}}}", parts.join(", "))), malformed)
    }
}

fn format_pair(key: &str, value: &str) -> String {
    let quoted = serde_json::to_string(key).unwrap_or_else(|_| format!("{key:?}"));
    format!("{quoted}: {value}")
}

/// Joins plain arguments with single spaces, first argument unprefixed.
pub(crate) fn join_values(args: &[Value]) -> String {
    let mut out = String::new();
    for (i, v) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&v.to_string());
    }
    out
}

/// Appends a rendered field block to a message: tab-separated when the
/// message is non-empty, block alone otherwise, message alone when there
/// is no block.
pub(crate) fn compose_message(msg: &str, block: Option<String>) -> String {
    match block {
        Some(block) if msg.is_empty() => block,
        Some(block) => format!("{msg}\t{block}"),
        None => msg.to_string(),
    }
}
