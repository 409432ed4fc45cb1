//! Numeric validation helpers used by configuration validators.

use crate::core::config::ConfigError;

/// Validates that a value is finite.
pub fn validate_finite(value: f64, field: &str) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("must be finite, got {}", value),
        })
    }
}

/// Validates that `min <= value <= max`.
pub fn validate_range(value: f64, min: f64, max: f64, field: &str) -> Result<(), ConfigError> {
    validate_finite(value, field)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Validates that `value >= min`.
pub fn validate_min(value: f64, min: f64, field: &str) -> Result<(), ConfigError> {
    validate_finite(value, field)?;
    if value < min {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("must be at least {}, got {}", min, value),
        });
    }
    Ok(())
}

/// Validates that a value is strictly positive.
pub fn validate_positive(value: f64, field: &str) -> Result<(), ConfigError> {
    validate_finite(value, field)?;
    if value <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("must be positive, got {}", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range() {
        assert!(validate_range(0.4, 0.0, 1.0, "shrink_ratio").is_ok());
        assert!(validate_range(1.0, 0.0, 1.0, "shrink_ratio").is_ok());
        assert!(validate_range(1.5, 0.0, 1.0, "shrink_ratio").is_err());
        assert!(validate_range(f64::NAN, 0.0, 1.0, "shrink_ratio").is_err());
    }

    #[test]
    fn test_validate_min_and_positive() {
        assert!(validate_min(1.0, 1.0, "iterations").is_ok());
        assert!(validate_min(0.0, 1.0, "iterations").is_err());
        assert!(validate_positive(0.035, "paragraph_break").is_ok());
        assert!(validate_positive(0.0, "paragraph_break").is_err());
    }
}
