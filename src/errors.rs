//! Error types for the contextual session system
//!
//! Provides the crate-wide error enum with a single retryable variant:
//! `ContextWindowExceeded` drives the session's escalating-reduction
//! retry loop; every other variant propagates unchanged to the caller.

use thiserror::Error;

/// Main error type for context management operations
#[derive(Error, Debug)]
pub enum ContextError {
    /// The prompt plus transcript no longer fits the model's context window.
    /// This is the only error the session retries.
    #[error("context window exceeded: {current} tokens > {max} tokens")]
    ContextWindowExceeded { current: usize, max: usize },

    /// Summarizing an empty entry list
    #[error("cannot summarize empty entries")]
    EmptyInput,

    /// A non-default locale was requested without explicit instructions
    #[error("locale '{locale}' requires explicit summarization instructions")]
    MissingLocaleInstructions { locale: String },

    /// Opaque generation failures (model errors, bad responses)
    #[error("generation error: {0}")]
    Generation(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContextError {
    /// Whether this error is the retryable context-overflow condition
    pub fn is_context_overflow(&self) -> bool {
        matches!(self, ContextError::ContextWindowExceeded { .. })
    }
}

/// Result type alias for context management operations
pub type Result<T> = std::result::Result<T, ContextError>;

/// Convert anyhow errors to ContextError
impl From<anyhow::Error> for ContextError {
    fn from(err: anyhow::Error) -> Self {
        ContextError::Generation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_display() {
        let err = ContextError::ContextWindowExceeded {
            current: 9000,
            max: 4096,
        };
        assert!(err.to_string().contains("9000"));
        assert!(err.to_string().contains("4096"));
        assert!(err.is_context_overflow());
    }

    #[test]
    fn test_non_overflow_errors_are_not_retryable() {
        assert!(!ContextError::EmptyInput.is_context_overflow());
        assert!(!ContextError::Generation("boom".to_string()).is_context_overflow());
        assert!(!ContextError::MissingLocaleInstructions {
            locale: "fr_FR".to_string()
        }
        .is_context_overflow());
    }
}
