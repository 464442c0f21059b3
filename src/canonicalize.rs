//! Reduction of a [`Value`] to its [`Canonical`] form.
//!
//! Two optional passes run as part of canonicalization:
//! - className scrubbing, applied to UI trees only, removes the digits that
//!   generated class names carry from one build to the next;
//! - function collapsing, which replaces a function with its declared name.
//!
//! Canonicalization is pure and idempotent for a fixed set of options.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::canonical::Canonical;
use crate::value::Value;

/// Placeholder for anonymous functions.
pub const ANONYMOUS_FUNCTION: &str = "[function]";

static CLASS_NAME_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)classname").expect("className key pattern is valid"));
static ASCII_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]").expect("digit pattern is valid"));

/// Toggles for the optional transformation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalizeOptions {
    /// Strip digits from string values of className-like keys in UI trees.
    pub scrub_class_names: bool,
    /// Replace functions with their name. When off, functions are dropped
    /// (they become absent) because they have no stored representation.
    pub collapse_functions: bool,
}

impl Default for CanonicalizeOptions {
    fn default() -> Self {
        Self {
            scrub_class_names: true,
            collapse_functions: true,
        }
    }
}

/// Canonicalizes with both passes enabled.
pub fn canonicalize(value: &Value) -> Canonical {
    canonicalize_with(value, CanonicalizeOptions::default())
}

/// Canonicalizes under explicit options.
///
/// # Examples
///
/// ```rust
/// use snapkeep::{canonicalize, Canonical, Value};
/// let v = Value::List(vec![Value::anonymous_function(), Value::function("onClick")]);
/// assert_eq!(
///     canonicalize(&v),
///     Canonical::List(vec![
///         Canonical::String("[function]".into()),
///         Canonical::String("onClick".into()),
///     ])
/// );
/// ```
pub fn canonicalize_with(value: &Value, options: CanonicalizeOptions) -> Canonical {
    match value {
        Value::Absent => Canonical::Absent,
        Value::Null => Canonical::Null,
        Value::Bool(b) => Canonical::Bool(*b),
        Value::Number(n) => Canonical::Number(n.clone()),
        Value::String(s) => Canonical::String(s.clone()),
        Value::List(items) => Canonical::List(
            items
                .iter()
                .map(|item| canonicalize_with(item, options))
                .collect(),
        ),
        Value::Map(entries) => Canonical::Map(
            entries
                .iter()
                // Only a literal empty key is skipped.
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, v)| (key.clone(), canonicalize_with(v, options)))
                .collect(),
        ),
        Value::Function(name) => {
            if !options.collapse_functions {
                return Canonical::Absent;
            }
            match name.as_deref() {
                Some(n) if !n.is_empty() => Canonical::String(n.to_string()),
                _ => Canonical::String(ANONYMOUS_FUNCTION.to_string()),
            }
        }
        Value::Tree(tree) => {
            let plain = if options.scrub_class_names {
                scrub_class_names(tree)
            } else {
                tree.clone()
            };
            canonicalize_with(&Value::from(plain), options)
        }
    }
}

/// Strips ASCII digits from every string stored under a key containing
/// `className` (any case), at any depth. Other values are recursed into and
/// otherwise left alone.
///
/// ```rust
/// use serde_json::json;
/// use snapkeep::canonicalize::scrub_class_names;
/// let tree = json!({"props": {"className": "btn-42 x1", "id": "a1"}});
/// assert_eq!(
///     scrub_class_names(&tree),
///     json!({"props": {"className": "btn- x", "id": "a1"}})
/// );
/// ```
pub fn scrub_class_names(tree: &serde_json::Value) -> serde_json::Value {
    match tree {
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(scrub_class_names).collect())
        }
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, v)| {
                    let scrubbed = match v {
                        serde_json::Value::String(s) if is_class_name_key(key) => {
                            serde_json::Value::String(strip_digits(s))
                        }
                        other => scrub_class_names(other),
                    };
                    (key.clone(), scrubbed)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

fn is_class_name_key(key: &str) -> bool {
    CLASS_NAME_KEY.is_match(key)
}

fn strip_digits(s: &str) -> String {
    ASCII_DIGITS.replace_all(s, "").into_owned()
}
