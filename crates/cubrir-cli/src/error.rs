//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error, fatal before the test runner is invoked
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Test-runner execution error
    #[error("Test execution failed: {message}")]
    TestExecution {
        /// Error message
        message: String,
    },

    /// A promised side effect (notes push, comment post) did not complete
    #[error("Publishing failed: {message}")]
    Publish {
        /// Error message
        message: String,
    },

    /// Coverage fell below the configured minimum under a fatal policy
    #[error("Coverage of {current_pct:.1}% is below the minimum of {minimum_pct:.1}%")]
    ThresholdNotMet {
        /// Current aggregate percentage
        current_pct: f64,
        /// Configured minimum percentage
        minimum_pct: f64,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cubrir library error
    #[error("Coverage error: {0}")]
    Coverage(#[from] cubrir::CoverageError),

    /// Git repository error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// HTTP transport error from the comment sink
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a test execution error
    #[must_use]
    pub fn test_execution(message: impl Into<String>) -> Self {
        Self::TestExecution {
            message: message.into(),
        }
    }

    /// Create a publishing error
    #[must_use]
    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish {
            message: message.into(),
        }
    }
}
