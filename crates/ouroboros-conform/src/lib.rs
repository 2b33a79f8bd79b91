//! Ouroboros Conform
//!
//! Spec-driven validation and auto-correction of nested value trees.
//!
//! A specification mirrors the shape of the data it checks. Leaves of the
//! specification are predicates with a message and an optional corrector;
//! inner nodes recurse into maps and lists, and wildcard nodes apply a spec to
//! every child of a collection before any key-specific overrides. A single
//! pass produces:
//!
//! - a copy of the input with every successful correction applied
//! - an [`ErrorMap`] mirroring the failed paths, or `None` if nothing failed
//!
//! # Features
//!
//! - **Default**: Core engine, predefined validators and correctors
//! - **serde**: Conversions between [`Value`]/[`ErrorMap`] and `serde_json`
//!
//! # Example
//!
//! ```rust
//! use ouroboros_conform::{path, validate, ErrorMap, SpecMap, Value};
//! use ouroboros_conform::validators::{less_than, min_length, number, required, string};
//!
//! let data = Value::map([(
//!     "a",
//!     Value::map([("name", Value::from("toxi")), ("age", Value::from(38))]),
//! )]);
//!
//! let spec = SpecMap::new().with(
//!     "a",
//!     SpecMap::new()
//!         .with("name", vec![string(), min_length(4)])
//!         .with("age", vec![number(), less_than(35)])
//!         .with("city", vec![required(), string()]),
//! );
//!
//! let (corrected, errors) = validate(&data, &spec);
//!
//! assert_eq!(corrected, data);
//! assert_eq!(
//!     errors,
//!     Some(
//!         ErrorMap::new()
//!             .with(path!["a", "city"], "is required")
//!             .with(path!["a", "age"], "must be less than 35")
//!     )
//! );
//! ```

// Public modules
pub mod config;
pub mod correctors;
pub mod engine;
pub mod errors;
pub mod formats;
pub mod spec;
pub mod types;
pub mod validators;

// Re-export commonly used types
pub use config::ConformConfig;
pub use engine::{validate, validate_key, validate_with_config, Conformed};
pub use errors::{ErrorMap, ErrorNode, PathError, SpecError, SpecResult};
pub use spec::{
    CorrectorFn, LeafSpec, PredicateFn, RawSpec, Shape, Spec, SpecKey, SpecMap, SpecPath, WILDCARD,
};
pub use types::{Key, Path, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
