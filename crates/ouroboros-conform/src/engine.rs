//! Validation engine
//!
//! Walks a [`SpecMap`] depth-first against a value tree, producing a
//! corrected copy of the tree and an [`ErrorMap`] of every uncorrected
//! failure.
//!
//! - A leaf spec reads the value at the current path (a missing value reads
//!   as `Null`). On failure its corrector is tried; a correction replaces the
//!   value and suppresses the error, otherwise the message is appended at the
//!   current path.
//! - A chain runs its leaf specs left to right and stops at the first
//!   uncorrected failure, so at most one message per chain is recorded.
//! - A nested spec recurses into each declared key in declaration order.
//! - A wildcard spec first applies its `each` spec to every child of the
//!   addressed collection (map keys, or list indices `0..len`), then applies
//!   each override to its key unless the wildcard pass already failed that
//!   key.
//!
//! The input tree is never modified: the pass works on its own copy and
//! only replaces nodes along corrected paths.
//!
//! # Example
//!
//! ```rust
//! use ouroboros_conform::{path, validate, ErrorMap, Spec, SpecMap, Value};
//! use ouroboros_conform::validators::{greater_than, number, positive};
//!
//! let data = Value::map([("a", Value::map([("b", Value::list([10, -20, 30]))]))]);
//! let spec = SpecMap::new().with(
//!     "a",
//!     SpecMap::new().with(
//!         "b",
//!         Spec::wildcard(vec![number(), positive()], SpecMap::new().with(2, greater_than(50))),
//!     ),
//! );
//!
//! let (corrected, errors) = validate(&data, &spec);
//!
//! assert_eq!(corrected, data);
//! assert_eq!(
//!     errors,
//!     Some(
//!         ErrorMap::new()
//!             .with(path!["a", "b", 1], "must be positive")
//!             .with(path!["a", "b", 2], "must be greater than 50")
//!     )
//! );
//! ```

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::config::ConformConfig;
use crate::errors::ErrorMap;
use crate::spec::{LeafSpec, Spec, SpecMap};
use crate::types::{Key, Path, Value};

/// What a missing path reads as
static NULL: Value = Value::Null;

// ============================================================================
// Public API
// ============================================================================

/// Result of a validation pass
#[derive(Debug, Clone)]
pub struct Conformed {
    /// The input tree with all corrections applied
    pub value: Value,
    /// Every uncorrected failure, or `None` if nothing failed
    pub errors: Option<ErrorMap>,
    /// Paths whose value was replaced, in application order
    pub corrections: Vec<Path>,
}

impl Conformed {
    /// Check if no leaf spec failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }

    /// Split into the corrected tree and the error map
    pub fn into_parts(self) -> (Value, Option<ErrorMap>) {
        (self.value, self.errors)
    }
}

/// Validate `value` against a top-level spec mapping
///
/// Returns the corrected tree and the error map, which is `None` if and
/// only if no leaf spec failed.
pub fn validate(value: &Value, specs: &SpecMap) -> (Value, Option<ErrorMap>) {
    validate_with_config(value, specs, &ConformConfig::default()).into_parts()
}

/// Validate `value` against a single top-level key and spec
pub fn validate_key(
    value: &Value,
    key: impl Into<Key>,
    spec: impl Into<Spec>,
) -> (Value, Option<ErrorMap>) {
    validate(value, &SpecMap::new().with(key, spec))
}

/// Validate `value` against a top-level spec mapping with custom config
pub fn validate_with_config(value: &Value, specs: &SpecMap, config: &ConformConfig) -> Conformed {
    let mut pass = Pass::new(value.clone(), config);
    run_nested(&mut pass, specs);

    let Pass {
        tree,
        errors,
        corrections,
        ..
    } = pass;

    debug!(
        keys = specs.len(),
        failures = errors.message_count(),
        corrections = corrections.len(),
        "validation pass complete"
    );

    Conformed {
        value: tree,
        errors: errors.into_option(),
        corrections,
    }
}

// ============================================================================
// Pass State
// ============================================================================

/// Outcome of one leaf spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Passed, or failed and was corrected
    Continue,
    /// Failed without correction
    Stop,
}

/// State threaded through one validation pass
///
/// `path` is pushed before descending into a child and popped afterwards, so
/// sibling keys always start from the same base path.
struct Pass<'a> {
    tree: Value,
    errors: ErrorMap,
    path: Path,
    corrections: Vec<Path>,
    config: &'a ConformConfig,
}

impl<'a> Pass<'a> {
    fn new(tree: Value, config: &'a ConformConfig) -> Self {
        Self {
            tree,
            errors: ErrorMap::new(),
            path: Path::new(),
            corrections: Vec::new(),
            config,
        }
    }
}

// ============================================================================
// Recursion
// ============================================================================

/// Apply `spec` to the child `key` of the current path
fn resolve_entry(pass: &mut Pass<'_>, key: &Key, spec: &Spec) {
    pass.path.push(key.clone());
    resolve_node(pass, spec);
    pass.path.pop();
}

/// Apply `spec` at the current path
fn resolve_node(pass: &mut Pass<'_>, spec: &Spec) {
    match spec {
        Spec::Leaf(leaf) => {
            run_leaf(pass, leaf);
        }
        Spec::Chain(leaves) => run_chain(pass, leaves),
        Spec::Nested(map) => run_nested(pass, map),
        Spec::Wildcard { each, overrides } => run_wildcard(pass, each, overrides),
    }
}

fn run_leaf(pass: &mut Pass<'_>, leaf: &LeafSpec) -> Flow {
    let current = pass.tree.get_in(pass.path.as_slice()).unwrap_or(&NULL);
    if leaf.check(current) {
        return Flow::Continue;
    }

    if let Some(corrected) = leaf.correct(current) {
        match pass.tree.set_in(pass.path.as_slice(), corrected) {
            Ok(()) => {
                trace!(path = %pass.path, "correction applied");
                if pass.config.record_corrections {
                    pass.corrections.push(pass.path.clone());
                }
                return Flow::Continue;
            }
            Err(err) => {
                warn!(path = %pass.path, error = %err, "correction could not be written");
            }
        }
    }

    let message = leaf
        .message()
        .unwrap_or(pass.config.fallback_message.as_str());
    trace!(path = %pass.path, failure = message, "leaf spec failed");
    pass.errors.append(&pass.path, message);
    Flow::Stop
}

fn run_chain(pass: &mut Pass<'_>, leaves: &[LeafSpec]) {
    for leaf in leaves {
        if run_leaf(pass, leaf) == Flow::Stop {
            break;
        }
    }
}

fn run_nested(pass: &mut Pass<'_>, map: &SpecMap) {
    for (key, spec) in map.iter() {
        resolve_entry(pass, key, spec);
    }
}

fn run_wildcard(pass: &mut Pass<'_>, each: &Spec, overrides: &SpecMap) {
    let keys = pass
        .tree
        .get_in(pass.path.as_slice())
        .map(Value::children_keys)
        .unwrap_or_default();

    let mut failed = BTreeSet::new();
    for key in keys {
        resolve_entry(pass, &key, each);
        if pass.errors.contains(&pass.path.child(key.clone())) {
            failed.insert(key);
        }
    }

    for (key, spec) in overrides.iter() {
        if failed.contains(key) {
            trace!(path = %pass.path, key = %key, "override skipped after wildcard failure");
            continue;
        }
        resolve_entry(pass, key, spec);
    }
}
