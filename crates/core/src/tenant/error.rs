//! Tenant error types.

use costline_shared::{AppError, types::TenantId};
use thiserror::Error;

/// Tenant-related errors.
#[derive(Debug, Error)]
pub enum TenantError {
    /// Schema identifier contains characters outside `[a-z0-9_]` or is empty/too long.
    #[error("Invalid tenant schema identifier: {0:?}")]
    InvalidSchemaName(String),

    /// Derived namespace collides with the shared or a system namespace.
    #[error("Tenant schema name {0:?} is reserved")]
    ReservedSchemaName(String),

    /// Tenant name is empty.
    #[error("Tenant name is required")]
    NameRequired,

    /// Project name is empty.
    #[error("Project name is required")]
    ProjectNameRequired,

    /// A text field exceeds its maximum length.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },

    /// Tenant not found.
    #[error("Tenant not found: {0}")]
    NotFound(TenantId),

    /// Tenant name or derived schema name already registered.
    #[error("Tenant with name {0:?} or a conflicting schema name already exists")]
    DuplicateName(String),
}

impl From<TenantError> for AppError {
    fn from(err: TenantError) -> Self {
        let message = err.to_string();
        match err {
            TenantError::InvalidSchemaName(_)
            | TenantError::ReservedSchemaName(_)
            | TenantError::NameRequired
            | TenantError::ProjectNameRequired
            | TenantError::FieldTooLong { .. } => Self::Validation(message),
            TenantError::NotFound(_) => Self::NotFound(message),
            TenantError::DuplicateName(_) => Self::Conflict(message),
        }
    }
}
