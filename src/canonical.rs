//! The canonical, comparison-ready value tree and its textual form.
//!
//! [`Canonical::render`] is the single serialization used both for the
//! comparator's line diff and for the values written into store files, so a
//! value reloaded from disk renders to exactly the text it was recorded from.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::Number;

use crate::errors::Result;
use crate::value::Value;

/// Literal used for a top-level absent value.
pub const ABSENT_LITERAL: &str = "undefined";

/// A normalized snapshot value. Functions have already collapsed to strings
/// and UI trees to plain maps.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Canonical {
    #[default]
    Absent,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Canonical>),
    Map(IndexMap<String, Canonical>),
}

impl Canonical {
    pub fn is_absent(&self) -> bool {
        matches!(self, Canonical::Absent)
    }

    /// Stable 2-space indented text form.
    ///
    /// Absent map entries are omitted, absent list elements render as
    /// `null`, and a top-level absent value renders as `undefined`.
    ///
    /// ```rust
    /// use snapkeep::Canonical;
    /// let c = Canonical::List(vec![Canonical::Bool(true), Canonical::Absent]);
    /// assert_eq!(c.render().unwrap(), "[\n  true,\n  null\n]");
    /// assert_eq!(Canonical::Absent.render().unwrap(), "undefined");
    /// ```
    pub fn render(&self) -> Result<String> {
        if self.is_absent() {
            return Ok(ABSENT_LITERAL.to_string());
        }
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for Canonical {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Canonical::Absent | Canonical::Null => serializer.serialize_unit(),
            Canonical::Bool(b) => serializer.serialize_bool(*b),
            Canonical::Number(n) => n.serialize(serializer),
            Canonical::String(s) => serializer.serialize_str(s),
            Canonical::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Canonical::Map(entries) => {
                let present = entries.values().filter(|v| !v.is_absent()).count();
                let mut map = serializer.serialize_map(Some(present))?;
                for (k, v) in entries.iter().filter(|(_, v)| !v.is_absent()) {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for Canonical {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Canonical::Null,
            serde_json::Value::Bool(b) => Canonical::Bool(b),
            serde_json::Value::Number(n) => Canonical::Number(n),
            serde_json::Value::String(s) => Canonical::String(s),
            serde_json::Value::Array(items) => {
                Canonical::List(items.into_iter().map(Canonical::from).collect())
            }
            serde_json::Value::Object(map) => Canonical::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Canonical::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Canonical> for Value {
    fn from(c: Canonical) -> Self {
        match c {
            Canonical::Absent => Value::Absent,
            Canonical::Null => Value::Null,
            Canonical::Bool(b) => Value::Bool(b),
            Canonical::Number(n) => Value::Number(n),
            Canonical::String(s) => Value::String(s),
            Canonical::List(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Canonical::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}
