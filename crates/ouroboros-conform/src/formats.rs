//! Format checks for common string patterns
//!
//! Pre-compiled regexes behind the `email`, `url` and `uuid` leaf specs.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// Pre-compiled Regex Patterns
// ============================================================================

/// Email regex pattern (RFC 5322 simplified)
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$")
        .expect("email pattern compiles")
});

/// URL regex pattern (http/https/ftp)
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?|ftp)://[^\s/$.?#][^\s]*$").expect("url pattern compiles")
});

/// UUID regex pattern (any version)
static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern compiles")
});

// ============================================================================
// Format Validators
// ============================================================================

/// Validate email format
///
/// # Example
/// ```
/// use ouroboros_conform::formats::validate_email;
///
/// assert!(validate_email("user@example.com"));
/// assert!(!validate_email("invalid-email"));
/// ```
pub fn validate_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Validate URL format
///
/// # Example
/// ```
/// use ouroboros_conform::formats::validate_url;
///
/// assert!(validate_url("https://example.com"));
/// assert!(validate_url("ftp://files.example.com/pub"));
/// assert!(!validate_url("example.com"));
/// ```
pub fn validate_url(value: &str) -> bool {
    URL_REGEX.is_match(value)
}

/// Validate UUID format
pub fn validate_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}
