//! Custom error types for rendicion
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for rendicion operations
#[derive(Error, Debug)]
pub enum RendicionError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A required field is missing or a value is out of range
    #[error("Validation error: {0}")]
    Validation(String),

    /// A persisted ledger payload could not be understood
    #[error("Format error: {0}")]
    Format(String),

    /// An emitter's formatting library is not available in this build
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RendicionError {
    /// Create a "not found" error for expense records
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a format error
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

impl From<std::io::Error> for RendicionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RendicionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for rendicion operations
pub type RendicionResult<T> = Result<T, RendicionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RendicionError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = RendicionError::expense_not_found("7");
        assert_eq!(err.to_string(), "Expense not found: 7");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_format_error() {
        let err = RendicionError::Format("expected value at line 1 column 1".into());
        assert!(err.is_format());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RendicionError = io_err.into();
        assert!(matches!(err, RendicionError::Io(_)));
    }
}
