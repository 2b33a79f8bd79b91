//! Specification tree
//!
//! A specification mirrors the structure of the value it checks. Each node is
//! one of four shapes:
//!
//! - [`Spec::Leaf`]: a single [`LeafSpec`] applied to the addressed value
//! - [`Spec::Chain`]: leaf specs applied in order, stopping at the first
//!   uncorrected failure
//! - [`Spec::Nested`]: a [`SpecMap`] recursing into child keys
//! - [`Spec::Wildcard`]: a spec applied to every child of the addressed
//!   collection, followed by per-key overrides
//!
//! Specs are usually built directly with the constructors on [`Spec`] and
//! [`SpecMap`]. Specs assembled from untyped parts (a list of leaves, a map
//! with a wildcard entry) go through [`RawSpec::classify`], which checks the
//! shape once and reports malformed input as a [`SpecError`].
//!
//! # Example
//!
//! ```rust
//! use ouroboros_conform::{Spec, SpecMap};
//! use ouroboros_conform::validators::{greater_than, number, positive};
//!
//! let spec = SpecMap::new().with(
//!     "scores",
//!     Spec::wildcard(vec![number(), positive()], SpecMap::new().with(0, greater_than(50))),
//! );
//! assert_eq!(spec.len(), 1);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::errors::{SpecError, SpecResult};
use crate::types::{Key, Path, Value};

// ============================================================================
// Leaf Spec
// ============================================================================

/// Predicate deciding whether a value passes a leaf spec
pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Corrector producing a replacement for a failing value, or `None`
pub type CorrectorFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Atomic validation unit: predicate, message and optional corrector
///
/// Both functions must be pure. A corrector returning `None` counts as a
/// failed correction and the message is recorded.
#[derive(Clone)]
pub struct LeafSpec {
    predicate: PredicateFn,
    message: Option<String>,
    corrector: Option<CorrectorFn>,
}

impl LeafSpec {
    /// Create a leaf spec from a predicate, with no message or corrector
    pub fn new<P>(predicate: P) -> Self
    where
        P: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: None,
            corrector: None,
        }
    }

    /// Set the error message recorded on failure
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the corrector tried on failure
    pub fn with_corrector<C>(mut self, corrector: C) -> Self
    where
        C: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.corrector = Some(Arc::new(corrector));
        self
    }

    /// Run the predicate
    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// Run the corrector, if any
    pub fn correct(&self, value: &Value) -> Option<Value> {
        self.corrector.as_ref().and_then(|corrector| corrector(value))
    }

    /// Message recorded on failure, if set
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Check if a corrector is attached
    pub fn has_corrector(&self) -> bool {
        self.corrector.is_some()
    }
}

impl fmt::Debug for LeafSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafSpec")
            .field("message", &self.message)
            .field("has_corrector", &self.corrector.is_some())
            .finish()
    }
}

// ============================================================================
// Spec Node
// ============================================================================

/// Shape of a spec node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Single leaf spec
    Leaf,
    /// Ordered, fail-fast leaf specs
    Chain,
    /// Key-to-spec mapping
    Nested,
    /// Key-to-spec mapping with a spec for every child
    Wildcard,
}

/// Spec node
#[derive(Debug, Clone)]
pub enum Spec {
    /// Single leaf spec
    Leaf(LeafSpec),

    /// Leaf specs applied left to right, stopping at the first uncorrected
    /// failure
    Chain(Vec<LeafSpec>),

    /// Specs for child keys
    Nested(SpecMap),

    /// Spec for every child, then specs for specific children
    Wildcard {
        /// Applied to every child of the addressed collection first
        each: Box<Spec>,
        /// Applied afterwards, skipping children `each` already failed
        overrides: SpecMap,
    },
}

impl Spec {
    /// Single leaf spec
    pub fn leaf(leaf: LeafSpec) -> Self {
        Self::Leaf(leaf)
    }

    /// Ordered fail-fast chain
    pub fn chain(leaves: impl IntoIterator<Item = LeafSpec>) -> Self {
        Self::Chain(leaves.into_iter().collect())
    }

    /// Nested spec
    pub fn nested(map: SpecMap) -> Self {
        Self::Nested(map)
    }

    /// Wildcard spec with per-key overrides
    pub fn wildcard(each: impl Into<Spec>, overrides: SpecMap) -> Self {
        Self::Wildcard {
            each: Box::new(each.into()),
            overrides,
        }
    }

    /// Wildcard spec with no overrides
    pub fn each(each: impl Into<Spec>) -> Self {
        Self::wildcard(each, SpecMap::new())
    }

    /// Shape of this node
    pub fn shape(&self) -> Shape {
        match self {
            Self::Leaf(_) => Shape::Leaf,
            Self::Chain(_) => Shape::Chain,
            Self::Nested(_) => Shape::Nested,
            Self::Wildcard { .. } => Shape::Wildcard,
        }
    }
}

impl From<LeafSpec> for Spec {
    fn from(leaf: LeafSpec) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<Vec<LeafSpec>> for Spec {
    fn from(leaves: Vec<LeafSpec>) -> Self {
        Self::Chain(leaves)
    }
}

impl From<SpecMap> for Spec {
    fn from(map: SpecMap) -> Self {
        Self::Nested(map)
    }
}

// ============================================================================
// Spec Map
// ============================================================================

/// Insertion-ordered mapping from key to spec node
///
/// Entries are applied in declaration order. Inserting a key that is already
/// present replaces its spec in place.
#[derive(Debug, Clone, Default)]
pub struct SpecMap {
    entries: Vec<(Key, Spec)>,
}

impl SpecMap {
    /// Create an empty spec map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<Key>, spec: impl Into<Spec>) -> Self {
        self.insert(key, spec);
        self
    }

    /// Insert a spec, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<Key>, spec: impl Into<Spec>) -> Option<Spec> {
        let key = key.into();
        let spec = spec.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, spec)),
            None => {
                self.entries.push((key, spec));
                None
            }
        }
    }

    /// Spec declared for `key`
    pub fn get(&self, key: &Key) -> Option<&Spec> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Spec)> {
        self.entries.iter().map(|(k, s)| (k, s))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classify a top-level mapping built from untyped parts
    ///
    /// The top level addresses the root of the value, which has no parent to
    /// iterate, so a wildcard entry is rejected.
    pub fn from_raw(entries: Vec<(SpecKey, RawSpec)>) -> SpecResult<Self> {
        let mut path = SpecPath::new();
        match classify_map(entries, &mut path)? {
            Spec::Nested(map) => Ok(map),
            _ => Err(SpecError::WildcardAtRoot),
        }
    }
}

impl<K: Into<Key>, S: Into<Spec>> FromIterator<(K, S)> for SpecMap {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, spec)| map.with(key, spec))
    }
}

// ============================================================================
// Untyped Specs and the Shape Classifier
// ============================================================================

/// Key of an untyped nested spec: a data key or the wildcard
///
/// The wildcard is its own variant, so it can never collide with a data key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecKey {
    /// Applies to every child
    Wildcard,
    /// Applies to one child
    Key(Key),
}

/// The wildcard spec key
pub const WILDCARD: SpecKey = SpecKey::Wildcard;

impl From<Key> for SpecKey {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

macro_rules! spec_key_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for SpecKey {
                fn from(key: $ty) -> Self {
                    Self::Key(Key::from(key))
                }
            }
        )+
    };
}

spec_key_from!(&str, String, i32, i64, usize);

impl fmt::Display for SpecKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => write!(f, "[*]"),
            Self::Key(key) => write!(f, "{}", key),
        }
    }
}

/// Location inside a spec tree
///
/// Unlike a data [`Path`], a spec path can pass through wildcard entries,
/// which are kept as [`SpecKey::Wildcard`] segments rather than as any data
/// key. Displays as dot-joined segments with the wildcard as `[*]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecPath(Vec<SpecKey>);

impl SpecPath {
    /// Create the empty (root) spec path
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Push a segment onto the path
    pub fn push(&mut self, key: SpecKey) {
        self.0.push(key);
    }

    /// Pop the last segment
    pub fn pop(&mut self) -> Option<SpecKey> {
        self.0.pop()
    }

    /// Segments of this path, root first
    pub fn as_slice(&self) -> &[SpecKey] {
        &self.0
    }

    /// Data path addressed by this spec path, `None` if it crosses a wildcard
    pub fn to_path(&self) -> Option<Path> {
        self.0
            .iter()
            .map(|key| match key {
                SpecKey::Wildcard => None,
                SpecKey::Key(key) => Some(key.clone()),
            })
            .collect()
    }
}

impl From<Path> for SpecPath {
    fn from(path: Path) -> Self {
        Self(path.as_slice().iter().cloned().map(SpecKey::Key).collect())
    }
}

impl FromIterator<SpecKey> for SpecPath {
    fn from_iter<I: IntoIterator<Item = SpecKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for SpecPath {
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

/// Spec assembled from untyped parts, not yet classified
#[derive(Debug, Clone)]
pub enum RawSpec {
    /// A leaf spec
    Leaf(LeafSpec),
    /// A sequence, expected to hold only leaf specs
    Seq(Vec<RawSpec>),
    /// A mapping, possibly with one wildcard entry
    Map(Vec<(SpecKey, RawSpec)>),
}

impl RawSpec {
    /// Build an untyped sequence
    pub fn seq(items: impl IntoIterator<Item = RawSpec>) -> Self {
        Self::Seq(items.into_iter().collect())
    }

    /// Build an untyped mapping
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<SpecKey>,
        I: IntoIterator<Item = (K, RawSpec)>,
    {
        Self::Map(entries.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// Classify into a typed [`Spec`]
    ///
    /// - a leaf is a [`Spec::Leaf`]
    /// - a sequence of leaves is a [`Spec::Chain`] (an empty one is a no-op)
    /// - a mapping without a wildcard is a [`Spec::Nested`]
    /// - a mapping with one wildcard is a [`Spec::Wildcard`]
    ///
    /// Anything else is a [`SpecError`].
    pub fn classify(self) -> SpecResult<Spec> {
        self.classify_at(&mut SpecPath::new())
    }

    fn classify_at(self, path: &mut SpecPath) -> SpecResult<Spec> {
        match self {
            Self::Leaf(leaf) => Ok(Spec::Leaf(leaf)),
            Self::Seq(items) => {
                let mut leaves = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    match item {
                        Self::Leaf(leaf) => leaves.push(leaf),
                        _ => {
                            return Err(SpecError::MalformedChain {
                                path: path.clone(),
                                index,
                            })
                        }
                    }
                }
                Ok(Spec::Chain(leaves))
            }
            Self::Map(entries) => classify_map(entries, path),
        }
    }
}

impl From<LeafSpec> for RawSpec {
    fn from(leaf: LeafSpec) -> Self {
        Self::Leaf(leaf)
    }
}

fn classify_map(entries: Vec<(SpecKey, RawSpec)>, path: &mut SpecPath) -> SpecResult<Spec> {
    let mut seen = BTreeSet::new();
    let mut each = None;
    let mut overrides = SpecMap::new();

    for (spec_key, raw) in entries {
        match spec_key {
            SpecKey::Wildcard => {
                if each.is_some() {
                    return Err(SpecError::DuplicateWildcard { path: path.clone() });
                }
                path.push(SpecKey::Wildcard);
                let classified = raw.classify_at(path);
                path.pop();
                each = Some(classified?);
            }
            SpecKey::Key(key) => {
                if !seen.insert(key.clone()) {
                    return Err(SpecError::DuplicateKey {
                        path: path.clone(),
                        key,
                    });
                }
                path.push(SpecKey::Key(key.clone()));
                let classified = raw.classify_at(path);
                path.pop();
                overrides.insert(key, classified?);
            }
        }
    }

    Ok(match each {
        Some(each) => Spec::wildcard(each, overrides),
        None => Spec::Nested(overrides),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    fn always() -> LeafSpec {
        LeafSpec::new(|_| true)
    }

    #[test]
    fn test_leaf_spec_builder() {
        let leaf = LeafSpec::new(|v| v.is_null()).with_message("must be null");
        assert!(leaf.check(&Value::Null));
        assert!(!leaf.check(&Value::Int(1)));
        assert_eq!(leaf.message(), Some("must be null"));
        assert!(!leaf.has_corrector());
        assert_eq!(leaf.correct(&Value::Int(1)), None);

        let leaf = leaf.with_corrector(|_| Some(Value::Null));
        assert!(leaf.has_corrector());
        assert_eq!(leaf.correct(&Value::Int(1)), Some(Value::Null));
    }

    #[test]
    fn test_spec_shapes() {
        assert_eq!(Spec::from(always()).shape(), Shape::Leaf);
        assert_eq!(Spec::from(vec![always(), always()]).shape(), Shape::Chain);
        assert_eq!(Spec::from(SpecMap::new()).shape(), Shape::Nested);
        assert_eq!(Spec::each(always()).shape(), Shape::Wildcard);
    }

    #[test]
    fn test_spec_map_keeps_declaration_order() {
        let map = SpecMap::new()
            .with("b", always())
            .with("a", always())
            .with(0, always());
        let keys: Vec<&Key> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&Key::from("b"), &Key::from("a"), &Key::Int(0)]);
    }

    #[test]
    fn test_spec_map_insert_replaces_in_place() {
        let mut map = SpecMap::new().with("a", always()).with("b", always());
        let replaced = map.insert("a", vec![always()]);
        assert!(matches!(replaced, Some(Spec::Leaf(_))));
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next().map(|(_, s)| s.shape()), Some(Shape::Chain));
    }

    #[test]
    fn test_classify_leaf_and_chain() {
        assert_eq!(RawSpec::from(always()).classify().unwrap().shape(), Shape::Leaf);

        let chain = RawSpec::seq([RawSpec::from(always()), RawSpec::from(always())])
            .classify()
            .unwrap();
        assert!(matches!(chain, Spec::Chain(ref leaves) if leaves.len() == 2));

        let empty = RawSpec::seq(Vec::new()).classify().unwrap();
        assert!(matches!(empty, Spec::Chain(ref leaves) if leaves.is_empty()));
    }

    #[test]
    fn test_classify_nested_and_wildcard() {
        let nested = RawSpec::map([("a", RawSpec::from(always()))]).classify().unwrap();
        assert_eq!(nested.shape(), Shape::Nested);

        let wildcard = RawSpec::map([
            (WILDCARD, RawSpec::from(always())),
            (SpecKey::from(2), RawSpec::from(always())),
        ])
        .classify()
        .unwrap();
        match wildcard {
            Spec::Wildcard { each, overrides } => {
                assert_eq!(each.shape(), Shape::Leaf);
                assert!(overrides.get(&Key::Int(2)).is_some());
                assert_eq!(overrides.len(), 1);
            }
            other => panic!("expected wildcard, got {:?}", other.shape()),
        }
    }

    #[test]
    fn test_classify_rejects_nested_seq() {
        let raw = RawSpec::map([(
            "a",
            RawSpec::seq([
                RawSpec::from(always()),
                RawSpec::seq([RawSpec::from(always())]),
            ]),
        )]);
        match raw.classify() {
            Err(SpecError::MalformedChain { path, index }) => {
                assert_eq!(path, SpecPath::from(path!["a"]));
                assert_eq!(index, 1);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_classify_error_inside_wildcard_keeps_wildcard_segment() {
        let malformed = || {
            RawSpec::seq([
                RawSpec::from(always()),
                RawSpec::map([("x", RawSpec::from(always()))]),
            ])
        };

        let under_wildcard = RawSpec::map([("a", RawSpec::map([(WILDCARD, malformed())]))]);
        let under_star_key = RawSpec::map([("a", RawSpec::map([("*", malformed())]))]);

        let wildcard_path = match under_wildcard.classify() {
            Err(SpecError::MalformedChain { path, .. }) => path,
            other => panic!("unexpected: {:?}", other),
        };
        let star_path = match under_star_key.classify() {
            Err(SpecError::MalformedChain { path, .. }) => path,
            other => panic!("unexpected: {:?}", other),
        };

        assert_eq!(
            wildcard_path,
            [SpecKey::from("a"), WILDCARD].into_iter().collect::<SpecPath>()
        );
        assert_eq!(wildcard_path.to_string(), "a.[*]");
        assert_eq!(wildcard_path.to_path(), None);

        assert_ne!(wildcard_path, star_path);
        assert_eq!(star_path.to_string(), "a.*");
        assert_eq!(star_path.to_path(), Some(path!["a", "*"]));
    }

    #[test]
    fn test_classify_rejects_duplicates() {
        let raw = RawSpec::map([
            ("a", RawSpec::from(always())),
            ("a", RawSpec::from(always())),
        ]);
        assert!(matches!(raw.classify(), Err(SpecError::DuplicateKey { .. })));

        let raw = RawSpec::map([
            (WILDCARD, RawSpec::from(always())),
            (WILDCARD, RawSpec::from(always())),
        ]);
        assert!(matches!(raw.classify(), Err(SpecError::DuplicateWildcard { .. })));
    }

    #[test]
    fn test_spec_map_from_raw_rejects_root_wildcard() {
        let entries = vec![(WILDCARD, RawSpec::from(always()))];
        assert!(matches!(SpecMap::from_raw(entries), Err(SpecError::WildcardAtRoot)));

        let entries = vec![(SpecKey::from("a"), RawSpec::from(always()))];
        assert_eq!(SpecMap::from_raw(entries).unwrap().len(), 1);
    }
}
