//! Error types for TaskRank operations.
//!
//! The scoring engine itself has no failure states for well-typed input:
//! malformed task fields are coerced, never rejected. [`TaskRankError`]
//! covers everything around it: configuration, file I/O, and payloads that
//! cannot be read as a task batch at all.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`TaskRankError`].
pub type Result<T> = std::result::Result<T, TaskRankError>;

/// Error type for all TaskRank operations outside the pure scoring core.
#[derive(Debug, Error)]
pub enum TaskRankError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file not found
    #[error("Configuration not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file is invalid YAML
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// JSON parsing error
    #[error("JSON parse error in {context}: {message}")]
    JsonParse {
        context: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Payload parsed but is not a task batch
    #[error("Invalid task payload: {message}")]
    InvalidPayload { message: String },

    /// Date argument could not be parsed
    #[error("Invalid date '{value}': expected YYYY-MM-DD or YYYY/MM/DD")]
    InvalidDate { value: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in TaskRank)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TaskRankError {
    /// Create a ConfigNotFound error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a ConfigNotFound error with source
    pub fn config_not_found_with_source(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: Some(source),
        }
    }

    /// Create a ConfigValidation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a JSON parse error
    pub fn json_parse(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParse {
            context: context.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create an invalid payload error
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Error classification helpers
    // =========================================================================

    /// Returns true if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigInvalid { .. } | Self::ConfigValidation { .. }
        )
    }

    /// Returns true if the caller supplied input that could not be read
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::JsonParse { .. } | Self::InvalidPayload { .. } | Self::InvalidDate { .. }
        )
    }

    /// Returns actionable guidance for the user
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => Some("Pass --config with an existing YAML file or omit it to use defaults"),
            Self::ConfigInvalid { .. } => Some("Check YAML syntax and field names in the configuration file"),
            Self::ConfigValidation { .. } => {
                Some("Scoring weights must be non-negative and sum to 1.0")
            }
            Self::JsonParse { .. } => Some("Input must be valid JSON"),
            Self::InvalidPayload { .. } => {
                Some("Provide a JSON array of tasks or an object with a \"tasks\" array")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_error() {
        let err = TaskRankError::config_not_found("/home/user/.taskrank/config.yaml");
        assert!(err.to_string().contains("Configuration not found"));
        assert!(err.is_config_error());
        assert!(!err.is_input_error());
        assert!(err.guidance().is_some());
    }

    #[test]
    fn test_json_parse_error() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = TaskRankError::json_parse("stdin", source);
        assert!(err.to_string().contains("stdin"));
        assert!(err.is_input_error());
        assert_eq!(err.guidance(), Some("Input must be valid JSON"));
    }

    #[test]
    fn test_invalid_date_message() {
        let err = TaskRankError::InvalidDate {
            value: "tomorrow".into(),
        };
        assert!(err.to_string().contains("tomorrow"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_internal_has_no_guidance() {
        assert_eq!(TaskRankError::internal("bug").guidance(), None);
    }
}
