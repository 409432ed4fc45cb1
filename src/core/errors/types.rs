//! Core error types for line resolution.
//!
//! This module defines the error enum shared by the geometry primitives, the
//! clustering strategies and the page orchestrator, together with the
//! [`ProcessingStage`] used to label collaborator failures.

use thiserror::Error;

/// Enum representing the stage in which a wrapped failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// External word detection.
    Detection,
    /// External text recognition.
    Recognition,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Detection => write!(f, "detection"),
            ProcessingStage::Recognition => write!(f, "recognition"),
        }
    }
}

/// Errors raised while resolving words into lines.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A page shape did not have exactly two components (height, width).
    #[error("{name} should have 2 components (height, width), found {len}")]
    InvalidShape {
        /// Name of the offending shape argument.
        name: &'static str,
        /// Number of components actually supplied.
        len: usize,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// A band localizer broke its contract by returning an index outside the band list.
    #[error("band localizer returned index {index} for {bands} bands")]
    BandOutOfRange {
        /// The index returned by the localizer.
        index: usize,
        /// Number of bands the localizer was given.
        bands: usize,
    },

    /// Error reported by an external collaborator (detector, recognizer).
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// Error parsing a JSON configuration.
    #[error("json")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type LayoutResult<T> = Result<T, LayoutError>;

impl From<crate::core::config::ConfigError> for LayoutError {
    /// Converts a ConfigError to LayoutError::ConfigError.
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

impl LayoutError {
    /// Creates an [`LayoutError::InvalidShape`] for the named argument.
    pub fn invalid_shape(name: &'static str, len: usize) -> Self {
        Self::InvalidShape { name, len }
    }

    /// Creates a validation error describing what was expected and what was received.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use wordline::core::errors::LayoutError;
    /// let err = LayoutError::validation_error("PageReader", "crops", "4 crops", "3 crops");
    /// assert!(matches!(err, LayoutError::InvalidInput { .. }));
    /// ```
    pub fn validation_error(
        component: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            message: format!(
                "{}: invalid '{}': expected {}, got {}",
                component.into(),
                field.into(),
                expected.into(),
                actual.into()
            ),
        }
    }

    /// Wraps an error raised by a detector or recognizer implementation.
    pub fn collaborator_error(
        kind: ProcessingStage,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_shape_message() {
        let err = LayoutError::invalid_shape("dest_shape", 3);
        assert_eq!(
            err.to_string(),
            "dest_shape should have 2 components (height, width), found 3"
        );
    }

    #[test]
    fn test_collaborator_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "model missing");
        let err = LayoutError::collaborator_error(ProcessingStage::Detection, "word detector", io);
        assert_eq!(err.to_string(), "detection failed: word detector");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error_conversion() {
        let cfg = crate::core::config::ConfigError::InvalidValue {
            field: "paragraph_break".to_string(),
            message: "must be positive".to_string(),
        };
        let err: LayoutError = cfg.into();
        assert!(matches!(err, LayoutError::ConfigError { .. }));
        assert!(err.to_string().contains("paragraph_break"));
    }
}
