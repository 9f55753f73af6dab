//! Persistence error type and its mapping onto [`AppError`].

use costline_core::category::CategoryError;
use costline_core::expense::ExpenseError;
use costline_core::rollup::InvalidDateWindow;
use costline_core::tenant::TenantError;
use costline_core::wbs::WbsError;
use costline_shared::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors raised by the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// WBS rule violation.
    #[error(transparent)]
    Wbs(#[from] WbsError),

    /// Expense rule violation.
    #[error(transparent)]
    Expense(#[from] ExpenseError),

    /// Tenant rule violation.
    #[error(transparent)]
    Tenant(#[from] TenantError),

    /// Category rule violation.
    #[error(transparent)]
    Category(#[from] CategoryError),

    /// Invalid rollup date window.
    #[error(transparent)]
    DateWindow(#[from] InvalidDateWindow),

    /// A multi-row write failed and was rolled back.
    #[error("Seeding failed and was rolled back: {0}")]
    Seed(Box<StoreError>),

    /// A stored row does not satisfy domain invariants.
    #[error("Corrupt {table} row: {detail}")]
    CorruptRow {
        /// Table name.
        table: &'static str,
        /// What was wrong.
        detail: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    pub(crate) fn corrupt(table: &'static str, detail: impl Into<String>) -> Self {
        Self::CorruptRow {
            table,
            detail: detail.into(),
        }
    }

    /// True if the database rejected the write with a unique-constraint violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(err) => matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))),
            Self::Seed(inner) => inner.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if err.is_unique_violation() && !matches!(err, StoreError::Seed(_)) {
            return Self::Conflict(err.to_string());
        }
        match err {
            StoreError::Wbs(e) => e.into(),
            StoreError::Expense(e) => e.into(),
            StoreError::Tenant(e) => e.into(),
            StoreError::Category(e) => e.into(),
            StoreError::DateWindow(e) => e.into(),
            StoreError::Seed(inner) => match AppError::from(*inner) {
                validation @ Self::Validation(_) => validation,
                other => Self::IntegrityFailure(other.to_string()),
            },
            StoreError::CorruptRow { table, detail } => {
                Self::Internal(format!("Corrupt {table} row: {detail}"))
            }
            StoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costline_shared::ErrorClass;

    #[test]
    fn test_other_database_errors_map_to_database() {
        let err = StoreError::Database(DbErr::RecordNotInserted);
        assert!(!err.is_unique_violation());
        assert!(matches!(AppError::from(err), AppError::Database(_)));
    }

    #[test]
    fn test_seed_failures_are_integrity_failures() {
        let err = StoreError::Seed(Box::new(StoreError::Wbs(WbsError::DuplicateCode(
            "1.1".into(),
        ))));
        let app = AppError::from(err);
        assert!(matches!(app, AppError::IntegrityFailure(_)));
        assert_eq!(app.class(), ErrorClass::RetryLater);
    }

    #[test]
    fn test_seed_validation_keeps_its_class() {
        let err = StoreError::Seed(Box::new(StoreError::Wbs(WbsError::NonPositiveQuantity)));
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
    }

    #[test]
    fn test_domain_errors_pass_through() {
        let err = StoreError::Tenant(TenantError::InvalidSchemaName("a;b".into()));
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
        let err = StoreError::corrupt("wbs_nodes", "status \"draft\"");
        assert!(matches!(AppError::from(err), AppError::Internal(_)));
    }
}
