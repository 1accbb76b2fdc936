//! Error types for the coverage-history model

use thiserror::Error;

/// Result type for library operations
pub type CoverageResult<T> = Result<T, CoverageError>;

/// Errors that can occur in the coverage-history model
#[derive(Debug, Error)]
pub enum CoverageError {
    /// Test-runner output could not be parsed into a snapshot
    #[error("Coverage parse error: {message}")]
    Parse {
        /// Error message
        message: String,
    },

    /// Snapshot encoding failed
    #[error("Snapshot codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// History log operation failed
    #[error("History log error: {message}")]
    History {
        /// Error message
        message: String,
    },
}

impl CoverageError {
    /// Create a parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a history log error
    #[must_use]
    pub fn history(message: impl Into<String>) -> Self {
        Self::History {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = CoverageError::parse("no total line");
        assert!(err.to_string().contains("parse"));
        assert!(err.to_string().contains("no total line"));
    }

    #[test]
    fn test_history_error_display() {
        let err = CoverageError::history("push rejected");
        assert!(err.to_string().contains("History"));
        assert!(err.to_string().contains("push rejected"));
    }

    #[test]
    fn test_codec_error_from() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: CoverageError = json_err.into();
        assert!(err.to_string().contains("codec"));
    }
}
