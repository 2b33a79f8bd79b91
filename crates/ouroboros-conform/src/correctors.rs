//! Reusable correctors
//!
//! A corrector receives a value that failed its predicate and returns a
//! replacement, or `None` when it has nothing to offer (the failure is then
//! recorded). All correctors here are idempotent, so running a corrected
//! value through the same spec again leaves it unchanged.

use crate::types::Value;

/// Cut strings to `max` characters and lists to `max` items
pub fn truncate(max: usize) -> impl Fn(&Value) -> Option<Value> + Send + Sync + 'static {
    move |v| match v {
        Value::String(s) => Some(Value::String(s.chars().take(max).collect())),
        Value::List(items) => Some(Value::List(items.iter().take(max).cloned().collect())),
        _ => None,
    }
}

/// Clamp numbers into `min..=max`, keeping integers integral when possible
pub fn clamp(
    min: impl Into<f64>,
    max: impl Into<f64>,
) -> impl Fn(&Value) -> Option<Value> + Send + Sync + 'static {
    let (min, max) = (min.into(), max.into());
    move |v| match v {
        Value::Int(i) => {
            let clamped = (*i as f64).max(min).min(max);
            if clamped.fract() == 0.0 {
                Some(Value::Int(clamped as i64))
            } else {
                Some(Value::Float(clamped))
            }
        }
        Value::Float(f) => Some(Value::Float(f.max(min).min(max))),
        _ => None,
    }
}

/// Replace any failing value with `default`
pub fn default_to(default: impl Into<Value>) -> impl Fn(&Value) -> Option<Value> + Send + Sync + 'static {
    let default = default.into();
    move |_| Some(default.clone())
}

/// Strip leading and trailing whitespace from strings
pub fn trim() -> impl Fn(&Value) -> Option<Value> + Send + Sync + 'static {
    |v| v.as_str().map(|s| Value::String(s.trim().to_string()))
}
