//! Error types for conformance checking
//!
//! Two very different things live here:
//!
//! - [`ErrorMap`]: the data produced by a validation pass. A field failing a
//!   check is expected, so failures are recorded here rather than returned
//!   as `Err`.
//! - [`SpecError`] and [`PathError`]: faults. A `SpecError` means the caller
//!   built a malformed specification; a `PathError` means a value could not
//!   be written back into the tree.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::spec::SpecPath;
use crate::types::{Key, Path};

// ============================================================================
// Specification Errors
// ============================================================================

/// Result type for specification construction
pub type SpecResult<T> = Result<T, SpecError>;

/// A specification that cannot be interpreted
#[derive(Debug, Error)]
pub enum SpecError {
    /// A sequence spec contains something other than leaf specs
    #[error("chain at '{path}' has a non-leaf spec at position {index}")]
    MalformedChain {
        /// Path of the chain
        path: SpecPath,
        /// Position of the offending element
        index: usize,
    },

    /// The same key appears twice in one nested spec
    #[error("nested spec at '{path}' declares key '{key}' more than once")]
    DuplicateKey {
        /// Path of the nested spec
        path: SpecPath,
        /// The repeated key
        key: Key,
    },

    /// More than one wildcard entry in one nested spec
    #[error("nested spec at '{path}' declares more than one wildcard")]
    DuplicateWildcard {
        /// Path of the nested spec
        path: SpecPath,
    },

    /// The top-level mapping contains a wildcard
    #[error("wildcard is not allowed in the top-level spec mapping")]
    WildcardAtRoot,

    /// A pattern validator was given an invalid regex
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

// ============================================================================
// Path Errors
// ============================================================================

/// A value could not be written at a path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// List index past the end of the list
    #[error("index {index} is out of range for a list of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the list
        len: usize,
    },

    /// Key that cannot address a list element
    #[error("key '{key}' cannot index a list")]
    NotAnIndex {
        /// The key
        key: Key,
    },

    /// Attempt to descend into a scalar
    #[error("cannot descend into {type_name} with key '{key}'")]
    NotACollection {
        /// The key
        key: Key,
        /// Type of the scalar
        type_name: &'static str,
    },
}

// ============================================================================
// Error Map
// ============================================================================

/// One node of an [`ErrorMap`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ErrorNode {
    /// Messages recorded at this path, in execution order
    Messages(Vec<String>),
    /// Children that have errors somewhere below
    Branch(BTreeMap<Key, ErrorNode>),
}

impl ErrorNode {
    /// Messages at this node, if it is a leaf
    pub fn messages(&self) -> Option<&[String]> {
        match self {
            Self::Messages(messages) => Some(messages),
            Self::Branch(_) => None,
        }
    }

    fn append(&mut self, rest: &[Key], message: String) {
        match (self, rest.split_first()) {
            (Self::Messages(messages), _) => messages.push(message),
            (Self::Branch(children), Some((key, rest))) => {
                append_into(children, key, rest, message);
            }
            (Self::Branch(children), None) => {
                append_into(children, &Key::Str(String::new()), &[], message);
            }
        }
    }

    fn count(&self) -> usize {
        match self {
            Self::Messages(messages) => messages.len(),
            Self::Branch(children) => children.values().map(ErrorNode::count).sum(),
        }
    }

    fn flatten_into(&self, path: &mut Path, out: &mut Vec<(Path, String)>) {
        match self {
            Self::Messages(messages) => {
                out.extend(messages.iter().map(|m| (path.clone(), m.clone())));
            }
            Self::Branch(children) => {
                for (key, child) in children {
                    path.push(key.clone());
                    child.flatten_into(path, out);
                    path.pop();
                }
            }
        }
    }
}

fn append_into(children: &mut BTreeMap<Key, ErrorNode>, key: &Key, rest: &[Key], message: String) {
    let node = children.entry(key.clone()).or_insert_with(|| {
        if rest.is_empty() {
            ErrorNode::Messages(Vec::new())
        } else {
            ErrorNode::Branch(BTreeMap::new())
        }
    });
    node.append(rest, message);
}

/// Tree of error messages mirroring the failed parts of a value
///
/// A path with no failures is absent at every level. An `ErrorMap` returned
/// from a validation pass is never empty; a clean pass returns `None`.
///
/// A message appended below a path that already holds messages is added to
/// that ancestor's sequence instead, and a message appended at a path that
/// already has errors below it is kept under the empty-string key of that
/// branch. The engine never produces either collision; no message is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ErrorMap {
    root: BTreeMap<Key, ErrorNode>,
}

impl ErrorMap {
    /// Create an empty error map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` to the sequence at `path`, creating it if absent
    ///
    /// Appending at the root path is a no-op: the root always mirrors a map.
    pub fn append(&mut self, path: &Path, message: impl Into<String>) {
        if let Some((key, rest)) = path.as_slice().split_first() {
            append_into(&mut self.root, key, rest, message.into());
        }
    }

    /// Builder form of [`append`](Self::append)
    pub fn with(mut self, path: Path, message: impl Into<String>) -> Self {
        self.append(&path, message);
        self
    }

    /// Node at `path`, if any error was recorded at or below it
    pub fn get(&self, path: &Path) -> Option<&ErrorNode> {
        let (first, rest) = path.as_slice().split_first()?;
        rest.iter()
            .try_fold(self.root.get(first)?, |node, key| match node {
                ErrorNode::Branch(children) => children.get(key),
                ErrorNode::Messages(_) => None,
            })
    }

    /// Messages recorded exactly at `path`
    pub fn messages(&self, path: &Path) -> Option<&[String]> {
        self.get(path).and_then(ErrorNode::messages)
    }

    /// Check if any error was recorded at or below `path`
    pub fn contains(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    /// Check if no error was recorded
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Total number of recorded messages
    pub fn message_count(&self) -> usize {
        self.root.values().map(ErrorNode::count).sum()
    }

    /// Top-level entries
    pub fn entries(&self) -> &BTreeMap<Key, ErrorNode> {
        &self.root
    }

    /// Every message with the path it was recorded at, in key order
    pub fn flatten(&self) -> Vec<(Path, String)> {
        let mut out = Vec::new();
        let mut path = Path::new();
        for (key, node) in &self.root {
            path.push(key.clone());
            node.flatten_into(&mut path, &mut out);
            path.pop();
        }
        out
    }

    /// `None` if empty, `Some(self)` otherwise
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Convert to a JSON object mirroring the value tree
    ///
    /// Integer keys become their decimal string, as JSON object keys must be
    /// strings.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Value {
        // Keys are integers or strings and leaves are string lists, which
        // always serialize.
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, message)) in self.flatten().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", path, message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_error_map_empty() {
        let errors = ErrorMap::new();
        assert!(errors.is_empty());
        assert_eq!(errors.message_count(), 0);
        assert!(errors.into_option().is_none());
    }

    #[test]
    fn test_error_map_append_keeps_order() {
        let mut errors = ErrorMap::new();
        errors.append(&path!["a", "b"], "first");
        errors.append(&path!["a", "b"], "second");

        assert_eq!(
            errors.messages(&path!["a", "b"]),
            Some(&["first".to_string(), "second".to_string()][..])
        );
        assert_eq!(errors.message_count(), 2);
    }

    #[test]
    fn test_error_map_mirrors_structure() {
        let errors = ErrorMap::new()
            .with(path!["a", "b", 1], "must be positive")
            .with(path!["a", "c"], "is required");

        assert!(errors.contains(&path!["a"]));
        assert!(errors.contains(&path!["a", "b"]));
        assert!(!errors.contains(&path!["a", "b", 0]));
        assert!(errors.messages(&path!["a"]).is_none());
        assert!(matches!(errors.get(&path!["a"]), Some(ErrorNode::Branch(_))));
    }

    #[test]
    fn test_error_map_append_below_messages_keeps_message() {
        let mut errors = ErrorMap::new();
        errors.append(&path!["a"], "outer");
        errors.append(&path!["a", "b"], "inner");

        assert_eq!(
            errors.messages(&path!["a"]),
            Some(&["outer".to_string(), "inner".to_string()][..])
        );
    }

    #[test]
    fn test_error_map_root_append_is_noop() {
        let mut errors = ErrorMap::new();
        errors.append(&Path::new(), "ignored");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_error_map_flatten_and_display() {
        let errors = ErrorMap::new()
            .with(path!["b"], "must be a string")
            .with(path!["a", 0], "must be positive");

        let flat = errors.flatten();
        assert_eq!(flat[0], (path!["a", 0], "must be positive".to_string()));
        assert_eq!(flat[1], (path!["b"], "must be a string".to_string()));
        assert_eq!(errors.to_string(), "a.0: must be positive\nb: must be a string");
    }

    #[test]
    fn test_spec_error_display() {
        let err = SpecError::MalformedChain {
            path: SpecPath::from(path!["a", "b"]),
            index: 2,
        };
        assert_eq!(err.to_string(), "chain at 'a.b' has a non-leaf spec at position 2");
        assert_eq!(
            SpecError::WildcardAtRoot.to_string(),
            "wildcard is not allowed in the top-level spec mapping"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_error_map_serializes_as_nested_object() {
        use serde_json::json;

        let errors = ErrorMap::new()
            .with(path!["users", 1, "email"], "must be a valid email address")
            .with(path!["users", 1, "email"], "is required")
            .with(path!["team"], "must be a string");

        let expected = json!({
            "team": ["must be a string"],
            "users": {"1": {"email": ["must be a valid email address", "is required"]}},
        });
        assert_eq!(serde_json::to_value(&errors).unwrap(), expected);
        assert_eq!(errors.to_json(), expected);
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"team":["must be a string"],"users":{"1":{"email":["must be a valid email address","is required"]}}}"#
        );
    }

    #[test]
    fn test_path_error_display() {
        let err = PathError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "index 4 is out of range for a list of length 2");
    }
}
