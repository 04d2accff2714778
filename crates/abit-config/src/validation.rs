//! Validation trait and helpers for configuration types

use crate::error::{ConfigError, Result};

/// Trait for validating configuration values
///
/// Implement this for any config type that needs checks beyond what the type
/// system expresses. Errors name the offending field in `section.field` form.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Validate that a float lies within `[min, max]`
pub fn validate_range(field: impl Into<String>, value: f32, min: f32, max: f32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Validate that an integer is strictly above `min`
pub fn validate_positive(field: impl Into<String>, value: usize, min: usize) -> Result<()> {
    if value <= min {
        return Err(ConfigError::InvalidInteger {
            field: field.into(),
            value,
            min,
        });
    }
    Ok(())
}

/// Validate that a string setting is present
pub fn validate_non_empty(field: impl Into<String>, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(field, "cannot be empty"));
    }
    Ok(())
}
