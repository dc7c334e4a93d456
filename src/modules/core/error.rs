//! Error types for Tabsmith

use thiserror::Error;

/// Main error type for Tabsmith operations
#[derive(Error, Debug)]
pub enum TabsmithError {
    /// The input is not a well-formed completion document
    #[error("Document error: {0}")]
    Document(String),

    /// Structural violation found while building the completion tree
    #[error("Validation error at '{path}': {message}")]
    Validation { path: String, message: String },

    /// A word cannot be represented in the target shell grammar
    #[error("Emission error: {0}")]
    Emission(String),

    /// CLI configuration error (paths, existing files)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion script installation error
    #[error("Install error: {0}")]
    Install(String),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TabsmithError {
    /// Build a validation error for the node at `path`
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        TabsmithError::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error was raised while compiling a document
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            TabsmithError::Document(_)
                | TabsmithError::Validation { .. }
                | TabsmithError::Emission(_)
        )
    }

    /// Path of the offending node, for validation errors
    pub fn path(&self) -> Option<&str> {
        match self {
            TabsmithError::Validation { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias using TabsmithError
pub type Result<T> = std::result::Result<T, TabsmithError>;
