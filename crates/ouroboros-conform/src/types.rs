//! Core data model for conformance checking
//!
//! This module defines the value tree being validated, the keys that address
//! its children, and the paths that address any node from the root.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::PathError;

// ============================================================================
// Key - addresses a child of a map or list
// ============================================================================

/// Key of a map entry or index of a list element
///
/// Integer keys address both integer map keys and list indices, so a single
/// path can walk through maps and lists alike.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Key {
    /// Integer key or list index
    Int(i64),
    /// String key
    Str(String),
}

impl Key {
    /// Interpret this key as a list index
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Int(i) => usize::try_from(*i).ok(),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// List index to key
///
/// An index above `i64::MAX` saturates to `i64::MAX`. No list can hold that
/// many elements, so a saturated key never addresses an existing element.
impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Self::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

// ============================================================================
// Path - addresses a node from the root
// ============================================================================

/// Ordered sequence of keys from the root to a node
///
/// The same path addresses a node in the data tree and in the error map.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(Vec<Key>);

impl Path {
    /// Create the empty (root) path
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Push a key onto the path
    pub fn push(&mut self, key: Key) {
        self.0.push(key);
    }

    /// Pop the last key from the path
    pub fn pop(&mut self) -> Option<Key> {
        self.0.pop()
    }

    /// Return a new path extended by `key`
    pub fn child(&self, key: impl Into<Key>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }

    /// Keys of this path, root first
    pub fn as_slice(&self) -> &[Key] {
        &self.0
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys in the path
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the path has no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self {
        Self(keys)
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build a [`Path`] from a list of keys
///
/// ```
/// use ouroboros_conform::{path, Key};
///
/// let p = path!["users", 0, "email"];
/// assert_eq!(p.as_slice()[1], Key::Int(0));
/// assert_eq!(p.to_string(), "users.0.email");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::types::Path::new()
    };
    ($($key:expr),+ $(,)?) => {
        $crate::types::Path::from(vec![$($crate::types::Key::from($key)),+])
    };
}

// ============================================================================
// Value Enum - Runtime values to be validated
// ============================================================================

/// Runtime value tree that can be validated and corrected
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null value, also what a missing path reads as
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (i64)
    Int(i64),
    /// Float value (f64)
    Float(f64),
    /// String value
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Indexed sequence of values
    List(Vec<Value>),
    /// Key-to-value mapping
    Map(BTreeMap<Key, Value>),
}

impl Value {
    /// Build a map from key/value pairs
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a list from values
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Get human-readable type name for log and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of integers and floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String view of string values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Length of a sized value
    ///
    /// Strings count characters, not bytes. `Null` has length 0 so that
    /// length checks on a missing value behave like checks on an empty one.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Null => Some(0),
            Self::String(s) => Some(s.chars().count()),
            Self::Bytes(b) => Some(b.len()),
            Self::List(items) => Some(items.len()),
            Self::Map(entries) => Some(entries.len()),
            Self::Bool(_) | Self::Int(_) | Self::Float(_) => None,
        }
    }

    /// Direct child addressed by `key`
    pub fn child(&self, key: &Key) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.get(key),
            Self::List(items) => key.as_index().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Node addressed by `path`, if present
    pub fn get_in(&self, path: &[Key]) -> Option<&Value> {
        path.iter().try_fold(self, |node, key| node.child(key))
    }

    /// Keys of every direct child, in iteration order
    ///
    /// Maps yield their keys in key order, lists yield `0..len`, and
    /// scalars have no children.
    pub fn children_keys(&self) -> Vec<Key> {
        match self {
            Self::Map(entries) => entries.keys().cloned().collect(),
            Self::List(items) => (0..items.len()).map(Key::from).collect(),
            _ => Vec::new(),
        }
    }

    /// Replace the node at `path` with `value`
    ///
    /// Missing map entries are created, a `Null` on the way down becomes an
    /// empty map, and index `len` of a list appends. Only the nodes along
    /// `path` are touched.
    pub fn set_in(&mut self, path: &[Key], value: Value) -> Result<(), PathError> {
        let Some((key, rest)) = path.split_first() else {
            *self = value;
            return Ok(());
        };

        if self.is_null() {
            *self = Self::Map(BTreeMap::new());
        }

        match self {
            Self::Map(entries) => entries
                .entry(key.clone())
                .or_insert(Value::Null)
                .set_in(rest, value),
            Self::List(items) => {
                let index = key.as_index().ok_or_else(|| PathError::NotAnIndex {
                    key: key.clone(),
                })?;
                if index == items.len() {
                    items.push(Value::Null);
                }
                let len = items.len();
                match items.get_mut(index) {
                    Some(item) => item.set_in(rest, value),
                    None => Err(PathError::IndexOutOfRange { index, len }),
                }
            }
            other => Err(PathError::NotACollection {
                key: key.clone(),
                type_name: other.type_name(),
            }),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<Key, Value>> for Value {
    fn from(entries: BTreeMap<Key, Value>) -> Self {
        Self::Map(entries)
    }
}

#[cfg(feature = "serde")]
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Bytes(b) => {
                serde_json::Value::Array(b.into_iter().map(|byte| byte.into()).collect())
            }
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Key::Str(k), v.into()))
                    .collect(),
            ),
        }
    }
}
