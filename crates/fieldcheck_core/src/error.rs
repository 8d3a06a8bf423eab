//! Error types for request validation.
//!
//! Validation failures are reported as data (see [`crate::ValidationReport`]);
//! the types here are what the orchestrator hands to its continuation.

use thiserror::Error;

/// Default failure value handed to the continuation.
///
/// Carries either the first error message or all messages joined by
/// newlines, depending on the orchestrator's aggregation policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    /// The final message
    pub message: String,
}

impl RequestError {
    /// Creates a new request error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the individual messages (one per line).
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.message.lines()
    }
}

impl From<String> for RequestError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message() {
        let err = RequestError::new("Url: Param id is required\nQuery: Param q is required");
        assert_eq!(err.to_string(), err.message);
        assert_eq!(err.lines().count(), 2);
    }
}
