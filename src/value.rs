//! The input value model.
//!
//! A [`Value`] is the closed set of shapes a test can hand to a snapshot
//! assertion. Anything richer converts into it: plain data through the
//! `From` impls or [`Value::from_serialize`], UI-tree wrappers through the
//! [`RenderTree`] capability.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Number;

use crate::errors::Result;

/// A raw, not yet canonicalized snapshot input.
///
/// # Examples
///
/// ```rust
/// use snapkeep::Value;
/// let v = Value::map([("id", Value::from(7)), ("render", Value::function("render"))]);
/// assert_eq!(v.type_name(), "Map");
/// assert!(Value::default().is_absent());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absent marker. Distinct from `Null`.
    #[default]
    Absent,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    /// Keyed mapping; iteration follows insertion order.
    Map(IndexMap<String, Value>),
    /// A function-valued entry, carrying its declared name if it has one.
    Function(Option<String>),
    /// A UI tree already rendered by its wrapper, pending className scrubbing.
    Tree(serde_json::Value),
}

/// Capability for UI-tree wrapper types that render into a plain JSON tree.
///
/// Implement this for component-testing wrappers and pass them through
/// [`Value::tree`]; the canonicalizer then scrubs generated class names.
pub trait RenderTree {
    fn render_tree(&self) -> serde_json::Value;
}

impl<T: RenderTree + ?Sized> RenderTree for &T {
    fn render_tree(&self) -> serde_json::Value {
        (**self).render_tree()
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "Absent",
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Function(_) => "Function",
            Value::Tree(_) => "Tree",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// A named function value.
    pub fn function(name: impl Into<String>) -> Self {
        Value::Function(Some(name.into()))
    }

    pub fn anonymous_function() -> Self {
        Value::Function(None)
    }

    /// Renders a UI-tree wrapper and tags the result for scrubbing.
    pub fn tree(wrapper: impl RenderTree) -> Self {
        Value::Tree(wrapper.render_tree())
    }

    /// Builds a map from `(key, value)` pairs, keeping their order.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Converts any serializable value through its JSON form.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(serde_json::to_value(value)?.into())
    }
}

// ----------------------------------------------------------------------------
// Conversions
// ----------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Value {
    /// Non-finite floats become `Null`, as they would in JSON.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::from(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    /// Plain JSON data. Use [`Value::tree`] for UI wrappers instead.
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}
