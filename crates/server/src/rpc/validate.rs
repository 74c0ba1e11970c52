//! Shared input-validation helpers.
//!
//! Each helper checks one declared constraint and produces a field-named
//! validation error. serde already enforces types and enum membership;
//! these cover the value-level constraints serde cannot express.

use crate::error::{AppError, Result};

/// Require a non-empty string after trimming.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Require a string of at most `max` characters.
pub fn require_max_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Require an integer within an inclusive range.
pub fn require_range(field: &str, value: i64, min: i64, max: i64) -> Result<()> {
    if value < min || value > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

/// Require an optional page-size limit to sit in `1..=max`.
pub fn require_limit(field: &str, value: Option<u32>, max: u32) -> Result<()> {
    if let Some(limit) = value
        && (limit == 0 || limit > max)
    {
        return Err(AppError::Validation(format!(
            "{field} must be between 1 and {max}"
        )));
    }
    Ok(())
}
