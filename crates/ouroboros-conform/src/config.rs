//! Configuration options for a validation pass

/// Message recorded when a failing leaf spec carries no message of its own
pub const DEFAULT_FALLBACK_MESSAGE: &str = "validation failed";

// ============================================================================
// Conform Config
// ============================================================================

/// Configuration options for a validation pass
#[derive(Debug, Clone)]
pub struct ConformConfig {
    /// Message recorded for failing leaf specs without a message
    pub fallback_message: String,

    /// Record the path of every applied correction
    pub record_corrections: bool,
}

impl Default for ConformConfig {
    fn default() -> Self {
        Self {
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            record_corrections: true,
        }
    }
}

impl ConformConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback message
    pub fn fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Enable or disable correction tracking
    pub fn record_corrections(mut self, record: bool) -> Self {
        self.record_corrections = record;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
