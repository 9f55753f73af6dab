//! Expense error types.

use costline_shared::{AppError, types::WbsNodeId};
use thiserror::Error;

/// Expense-related errors.
#[derive(Debug, Error)]
pub enum ExpenseError {
    /// Item description is blank.
    #[error("Item description is required")]
    DescriptionRequired,

    /// A monetary field is below zero.
    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),

    /// Quantity is zero or below.
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Amount has more than four fraction digits.
    #[error("{0} has more than 4 decimal places")]
    InvalidPrecision(&'static str),

    /// Amount exceeds the storage range.
    #[error("{0} exceeds 999999999999999.9999")]
    AmountOutOfRange(&'static str),

    /// A text field exceeds its maximum length.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },

    /// Target budget line does not exist in this tenant.
    #[error("WBS node not found: {0}")]
    NodeNotFound(WbsNodeId),
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        let message = err.to_string();
        match err {
            ExpenseError::NodeNotFound(_) => Self::NotFound(message),
            _ => Self::Validation(message),
        }
    }
}
