//! Shared primitives for all back-office Rust crates.

#![forbid(unsafe_code)]

/// Page and list-result primitives shared by every list endpoint.
pub mod pagination;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use pagination::{ListResult, Page};

/// Result type used across back-office crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Creates a validated non-empty string, naming the field in the error.
    pub fn for_field(field_name: &str, value: impl Into<String>) -> AppResult<Self> {
        Self::new(value)
            .map_err(|_| AppError::Validation(format!("{field_name} is required")))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Store unavailable, query failure, or other unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn for_field_names_the_missing_field() {
        let result = NonEmptyString::for_field("action", "");
        match result {
            Err(AppError::Validation(message)) => assert_eq!(message, "action is required"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
