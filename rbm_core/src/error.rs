//! Error types for RBM construction, sampling and training.
//!
//! Every failure is reported synchronously to the caller. Validation happens
//! before any parameter is written, so an `Err` never leaves a model
//! half-updated.

use thiserror::Error;

/// Result type alias for engine operations
pub type RbmResult<T> = Result<T, RbmError>;

/// Error type for engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RbmError {
    /// Training data contains a value outside [0, 1] (or NaN)
    #[error("Input value {value} at row {row}, column {col} lies outside [0, 1]")]
    InvalidInputRange { row: usize, col: usize, value: f64 },

    /// Matrix dimensions disagree with the model layout
    #[error("Shape mismatch in {context}: expected {expected}, got {got}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        got: usize,
    },

    /// Invalid hyperparameter or construction argument
    #[error("Invalid configuration for '{parameter}' with value '{value}': {reason}")]
    InvalidConfiguration {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Operation needs at least one sample column
    #[error("Empty input: {context} requires at least one column")]
    EmptyInput { context: String },
}

impl RbmError {
    pub(crate) fn shape(context: &str, expected: usize, got: usize) -> Self {
        RbmError::ShapeMismatch {
            context: context.to_string(),
            expected,
            got,
        }
    }

    pub(crate) fn config(parameter: &str, value: impl ToString, reason: &str) -> Self {
        RbmError::InvalidConfiguration {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = RbmError::shape("hidden_means", 4, 3);
        assert_eq!(
            err.to_string(),
            "Shape mismatch in hidden_means: expected 4, got 3"
        );
    }

    #[test]
    fn test_invalid_configuration_display() {
        let err = RbmError::config("momentum", 1.5, "must lie in [0, 1)");
        let msg = err.to_string();
        assert!(msg.contains("momentum"));
        assert!(msg.contains("1.5"));
    }
}
