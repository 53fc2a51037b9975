// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Error types

use thiserror::Error;

/// Result alias for fallible library operations
pub type ForestResult<T> = Result<T, ForestError>;

/// Errors raised outside the simulation core.
///
/// The models themselves never fail; these cover parameter validation and
/// the file surfaces around a run.
#[derive(Debug, Error)]
pub enum ForestError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for ForestError {
    fn from(err: serde_json::Error) -> Self {
        ForestError::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForestError::InvalidConfig("tick_minutes must be > 0".into());
        assert_eq!(err.to_string(), "Invalid configuration: tick_minutes must be > 0");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ForestError = io.into();
        assert!(matches!(err, ForestError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }
}
