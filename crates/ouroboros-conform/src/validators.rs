//! Predefined leaf specs
//!
//! Each factory returns a [`LeafSpec`] carrying a default message. Use
//! [`LeafSpec::with_message`] to replace the message and
//! [`LeafSpec::with_corrector`] to attach a corrector:
//!
//! ```rust
//! use ouroboros_conform::correctors::truncate;
//! use ouroboros_conform::validators::{max_length, required};
//!
//! let name = max_length(5).with_corrector(truncate(5));
//! let city = required().with_message("city is missing");
//! assert_eq!(city.message(), Some("city is missing"));
//! assert!(name.has_corrector());
//! ```
//!
//! Parametric validators close over their parameter, which appears in both
//! the predicate and the default message.

use regex::Regex;

use crate::errors::SpecResult;
use crate::formats;
use crate::spec::LeafSpec;
use crate::types::Value;

/// Build a leaf spec from a predicate and its default message
///
/// This is the constructor every factory in this module goes through.
pub fn validator<P>(message: impl Into<String>, predicate: P) -> LeafSpec
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
{
    LeafSpec::new(predicate).with_message(message)
}

/// Render a numeric parameter for a message (`35`, not `35.0`)
fn fmt_number(n: f64) -> String {
    format!("{}", n)
}

// ============================================================================
// Presence and Type
// ============================================================================

/// Value must be present and not null
pub fn required() -> LeafSpec {
    validator("is required", |v| !v.is_null())
}

/// Value must be an integer or a float
pub fn number() -> LeafSpec {
    validator("must be a number", |v| v.as_f64().is_some())
}

/// Value must be an integer
pub fn integer() -> LeafSpec {
    validator("must be an integer", |v| matches!(v, Value::Int(_)))
}

/// Value must be a string
pub fn string() -> LeafSpec {
    validator("must be a string", |v| matches!(v, Value::String(_)))
}

/// Value must be a boolean
pub fn boolean() -> LeafSpec {
    validator("must be a boolean", |v| matches!(v, Value::Bool(_)))
}

/// Value must be a map
pub fn map() -> LeafSpec {
    validator("must be a map", |v| matches!(v, Value::Map(_)))
}

/// Value must be a list
pub fn list() -> LeafSpec {
    validator("must be a list", |v| matches!(v, Value::List(_)))
}

// ============================================================================
// Numeric Comparisons
// ============================================================================

/// Number must be greater than zero
pub fn positive() -> LeafSpec {
    validator("must be positive", |v| v.as_f64().is_some_and(|n| n > 0.0))
}

/// Number must be less than zero
pub fn negative() -> LeafSpec {
    validator("must be negative", |v| v.as_f64().is_some_and(|n| n < 0.0))
}

/// Number must be strictly less than `limit`
pub fn less_than(limit: impl Into<f64>) -> LeafSpec {
    let limit = limit.into();
    validator(format!("must be less than {}", fmt_number(limit)), move |v| {
        v.as_f64().is_some_and(|n| n < limit)
    })
}

/// Number must be strictly greater than `limit`
pub fn greater_than(limit: impl Into<f64>) -> LeafSpec {
    let limit = limit.into();
    validator(format!("must be greater than {}", fmt_number(limit)), move |v| {
        v.as_f64().is_some_and(|n| n > limit)
    })
}

/// Number must lie in `min..=max`
pub fn in_range(min: impl Into<f64>, max: impl Into<f64>) -> LeafSpec {
    let (min, max) = (min.into(), max.into());
    validator(
        format!("must be between {} and {}", fmt_number(min), fmt_number(max)),
        move |v| v.as_f64().is_some_and(|n| min <= n && n <= max),
    )
}

// ============================================================================
// Length
// ============================================================================

/// String, list, map or bytes must have at least `min` items
pub fn min_length(min: usize) -> LeafSpec {
    validator(format!("must have a minimum length of {}", min), move |v| {
        v.len().is_some_and(|len| len >= min)
    })
}

/// String, list, map or bytes must have at most `max` items
pub fn max_length(max: usize) -> LeafSpec {
    validator(format!("must have a maximum length of {}", max), move |v| {
        v.len().is_some_and(|len| len <= max)
    })
}

/// String, list, map or bytes must have exactly `len` items
pub fn fixed_length(len: usize) -> LeafSpec {
    validator(format!("must have a length of {}", len), move |v| {
        v.len() == Some(len)
    })
}

/// String must have no leading or trailing whitespace
///
/// Pairs with [`crate::correctors::trim`].
pub fn trimmed() -> LeafSpec {
    validator("must not have surrounding whitespace", |v| {
        v.as_str().is_some_and(|s| s.trim() == s)
    })
}

// ============================================================================
// Membership and Patterns
// ============================================================================

/// Value must equal one of `allowed`
pub fn one_of(allowed: Vec<Value>) -> LeafSpec {
    let formatted: Vec<String> = allowed
        .iter()
        .map(|v| match v {
            Value::String(s) => format!("\"{}\"", s),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => format!("{:?}", v),
        })
        .collect();

    validator(
        format!("must be one of: [{}]", formatted.join(", ")),
        move |v| allowed.contains(v),
    )
}

/// String must match the regex `pattern`
pub fn matches(pattern: &str) -> SpecResult<LeafSpec> {
    let re = Regex::new(pattern)?;
    Ok(validator(format!("must match pattern {}", pattern), move |v| {
        v.as_str().is_some_and(|s| re.is_match(s))
    }))
}

/// String must be an email address
pub fn email() -> LeafSpec {
    validator("must be a valid email address", |v| {
        v.as_str().is_some_and(formats::validate_email)
    })
}

/// String must be a URL
pub fn url() -> LeafSpec {
    validator("must be a valid URL", |v| {
        v.as_str().is_some_and(formats::validate_url)
    })
}

/// String must be a UUID
pub fn uuid() -> LeafSpec {
    validator("must be a valid UUID", |v| {
        v.as_str().is_some_and(formats::validate_uuid)
    })
}
