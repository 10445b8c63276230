//! Error types for Clipagent.

use serde::Serialize;
use thiserror::Error;

/// Library-level error type for Clipagent operations.
#[derive(Error, Debug)]
pub enum ClipError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Precondition not met: {0}")]
    Precondition(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid tool call transition: {0}")]
    InvalidTransition(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Detection error: {0}")]
    Detection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Coarse classification of a [`ClipError`], recorded alongside failed tool calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Precondition,
    UnknownTool,
    InvalidArguments,
    Provider,
    Internal,
}

impl ClipError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClipError::NotFound(_) => ErrorKind::NotFound,
            ClipError::Precondition(_) => ErrorKind::Precondition,
            ClipError::UnknownTool(_) => ErrorKind::UnknownTool,
            ClipError::InvalidArguments(_) | ClipError::Json(_) => ErrorKind::InvalidArguments,
            ClipError::Provider(_) | ClipError::Http(_) => ErrorKind::Provider,
            _ => ErrorKind::Internal,
        }
    }
}

/// Result type alias for Clipagent operations.
pub type Result<T> = std::result::Result<T, ClipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(ClipError::NotFound("clip".into()).kind(), ErrorKind::NotFound);
        assert_eq!(ClipError::UnknownTool("x".into()).kind(), ErrorKind::UnknownTool);
        assert_eq!(ClipError::Detection("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_display() {
        let err = ClipError::Precondition("No accepted clips".to_string());
        assert_eq!(err.to_string(), "Precondition not met: No accepted clips");
    }
}
