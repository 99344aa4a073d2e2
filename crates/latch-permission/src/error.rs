//! Error types for permission construction
//!
//! Permission and template construction fail immediately and locally; there
//! is no partial success and nothing to retry.

use thiserror::Error;

/// Permission construction error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// Argument was present but empty after trimming
    #[error("Invalid argument: {0} must not be blank")]
    InvalidArgument(&'static str),

    /// Argument was absent altogether
    #[error("Missing input: {0} is required")]
    MissingInput(&'static str),

    /// Template does not contain exactly one placeholder
    #[error("Invalid template {template:?}: expected exactly one {placeholder} placeholder")]
    InvalidTemplate {
        /// The rejected template text.
        template: String,
        /// The placeholder token the template must contain.
        placeholder: &'static str,
    },
}

/// Result type for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;

impl PermissionError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            PermissionError::InvalidArgument(_) => "INVALID_ARGUMENT",
            PermissionError::MissingInput(_) => "MISSING_INPUT",
            PermissionError::InvalidTemplate { .. } => "INVALID_TEMPLATE",
        }
    }
}

/// Trim `value`, rejecting blank input on behalf of `field`.
pub(crate) fn require_trimmed<'a>(field: &'static str, value: &'a str) -> PermissionResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PermissionError::InvalidArgument(field));
    }
    Ok(trimmed)
}
