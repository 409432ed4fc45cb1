//! Configuration errors and the validation trait.

use thiserror::Error;

/// Errors produced while validating configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A field holds a value that is not allowed.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Name of the field.
        field: String,
        /// What is wrong with the value.
        message: String,
    },

    /// A field lies outside its inclusive range.
    #[error("'{field}' = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Name of the field.
        field: String,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
}

/// Trait for configuration types that can check their own invariants.
pub trait ConfigValidator {
    /// Validates the configuration, returning the first violation found.
    fn validate(&self) -> Result<(), ConfigError>;
}
