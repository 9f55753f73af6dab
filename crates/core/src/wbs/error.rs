//! WBS error types.

use costline_shared::{AppError, types::WbsNodeId};
use thiserror::Error;

use super::status::WbsStatus;

/// Errors raised while creating or transitioning WBS budget lines.
#[derive(Debug, Error)]
pub enum WbsError {
    /// Code is blank, too long, or malformed.
    #[error("Invalid WBS code: {0:?}")]
    InvalidCode(String),

    /// Description is blank.
    #[error("Description is required")]
    DescriptionRequired,

    /// A text field exceeds its maximum length.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },

    /// Unit cost is below zero.
    #[error("Unit cost must not be negative")]
    NegativeUnitCost,

    /// Quantity is zero or below.
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Duration is below zero.
    #[error("Duration must not be negative")]
    NegativeDuration,

    /// Amount has more than four fraction digits.
    #[error("{0} has more than 4 decimal places")]
    InvalidPrecision(&'static str),

    /// Amount or derived total exceeds the storage range.
    #[error("{0} exceeds 999999999999999.9999")]
    AmountOutOfRange(&'static str),

    /// Parent id does not exist in this tenant.
    #[error("Parent WBS node not found: {0}")]
    ParentNotFound(WbsNodeId),

    /// Parent code does not exist among seeded or stored lines.
    #[error("Parent WBS code not found: {0}")]
    ParentCodeNotFound(String),

    /// Code already used in this tenant.
    #[error("WBS code already exists: {0}")]
    DuplicateCode(String),

    /// Node id does not exist in this tenant.
    #[error("WBS node not found: {0}")]
    NotFound(WbsNodeId),

    /// Node code does not exist in this tenant.
    #[error("WBS code not found: {0}")]
    CodeNotFound(String),

    /// Status change not allowed from the current state.
    #[error("Cannot move WBS node from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: WbsStatus,
        /// Requested status.
        to: WbsStatus,
    },
}

impl From<WbsError> for AppError {
    fn from(err: WbsError) -> Self {
        let message = err.to_string();
        match err {
            WbsError::InvalidCode(_)
            | WbsError::DescriptionRequired
            | WbsError::FieldTooLong { .. }
            | WbsError::NegativeUnitCost
            | WbsError::NonPositiveQuantity
            | WbsError::NegativeDuration
            | WbsError::InvalidPrecision(_)
            | WbsError::AmountOutOfRange(_)
            | WbsError::ParentNotFound(_)
            | WbsError::ParentCodeNotFound(_) => Self::Validation(message),
            WbsError::DuplicateCode(_) | WbsError::InvalidTransition { .. } => {
                Self::Conflict(message)
            }
            WbsError::NotFound(_) | WbsError::CodeNotFound(_) => Self::NotFound(message),
        }
    }
}
