//! Application-wide error types.
//!
//! Every failure surfaced by the core maps onto one of these variants, and
//! every variant maps onto a stable [`ErrorClass`] so callers can decide
//! whether to fix their input, give up, or retry.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input, including invalid tenant identifiers.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (e.g., duplicate code or name, invalid state transition).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A multi-step write failed and was rolled back as a whole.
    #[error("Integrity failure: {0}")]
    IntegrityFailure(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of an [`AppError`] for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request itself is wrong; retrying unchanged will fail again.
    FixInput,
    /// The referenced resource does not exist.
    NothingToRetrieve,
    /// Transient failure; the same request may succeed later.
    RetryLater,
    /// Bug or unexpected state.
    Internal,
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::IntegrityFailure(_) => 503,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::IntegrityFailure(_) => "INTEGRITY_FAILURE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the caller-facing classification.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) | Self::Conflict(_) => ErrorClass::FixInput,
            Self::NotFound(_) => ErrorClass::NothingToRetrieve,
            Self::IntegrityFailure(_) | Self::Database(_) => ErrorClass::RetryLater,
            Self::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Returns true if the caller may retry the same request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.class(), ErrorClass::RetryLater)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::Conflict(String::new()), 409, "CONFLICT")]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::IntegrityFailure(String::new()), 503, "INTEGRITY_FAILURE")]
    #[case(AppError::Database(String::new()), 500, "DATABASE_ERROR")]
    #[case(AppError::Internal(String::new()), 500, "INTERNAL_ERROR")]
    fn test_status_and_error_codes(
        #[case] err: AppError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_error_classes_are_distinct_per_kind() {
        assert_eq!(
            AppError::Validation("bad".into()).class(),
            ErrorClass::FixInput
        );
        assert_eq!(AppError::Conflict("dup".into()).class(), ErrorClass::FixInput);
        assert_eq!(
            AppError::NotFound("gone".into()).class(),
            ErrorClass::NothingToRetrieve
        );
        assert_eq!(
            AppError::IntegrityFailure("seed".into()).class(),
            ErrorClass::RetryLater
        );
        assert_eq!(AppError::Internal("bug".into()).class(), ErrorClass::Internal);
    }

    #[test]
    fn test_only_transient_errors_are_retryable() {
        assert!(AppError::IntegrityFailure("x".into()).is_retryable());
        assert!(AppError::Database("x".into()).is_retryable());
        assert!(!AppError::Validation("x".into()).is_retryable());
        assert!(!AppError::NotFound("x".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::Conflict("msg".into()).to_string(),
            "Conflict: msg"
        );
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::IntegrityFailure("msg".into()).to_string(),
            "Integrity failure: msg"
        );
    }
}
