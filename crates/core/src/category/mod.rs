//! WBS category master data shared by every tenant.

use chrono::{DateTime, Utc};
use costline_shared::{AppError, types::CategoryId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_CATEGORY_CODE_LEN: usize = 10;
const MAX_CATEGORY_DESCRIPTION_LEN: usize = 255;

/// Category errors.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Code is blank or longer than 10 characters.
    #[error("Category code must be 1-10 characters without whitespace: {0:?}")]
    InvalidCode(String),

    /// Description is blank or longer than 255 characters.
    #[error("Category description must be 1-255 characters")]
    InvalidDescription,

    /// Category does not exist.
    #[error("WBS category not found: {0}")]
    NotFound(CategoryId),

    /// Another category already uses the code.
    #[error("WBS category code already exists: {0}")]
    DuplicateCode(String),

    /// WBS lines in the tenant still reference the category.
    #[error("WBS category {0} is still used by budget lines")]
    InUse(String),
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        let message = err.to_string();
        match err {
            CategoryError::InvalidCode(_) | CategoryError::InvalidDescription => {
                Self::Validation(message)
            }
            CategoryError::NotFound(_) => Self::NotFound(message),
            CategoryError::DuplicateCode(_) | CategoryError::InUse(_) => Self::Conflict(message),
        }
    }
}

/// A category row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbsCategory {
    /// Category id.
    pub id: CategoryId,
    /// Top-level code, e.g. `"7"`.
    pub code: String,
    /// Human description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    code: String,
    description: String,
}

impl NewCategory {
    /// Validates code and description.
    pub fn new(code: &str, description: &str) -> Result<Self, CategoryError> {
        Ok(Self {
            code: validate_code(code)?,
            description: validate_description(description)?,
        })
    }

    /// Category code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    /// New code.
    pub code: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl CategoryUpdate {
    /// Returns a copy with validated, trimmed fields.
    pub fn validated(self) -> Result<Self, CategoryError> {
        Ok(Self {
            code: self.code.as_deref().map(validate_code).transpose()?,
            description: self
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
        })
    }

    /// True when nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.description.is_none()
    }
}

fn validate_code(code: &str) -> Result<String, CategoryError> {
    let code = code.trim();
    if code.is_empty()
        || code.chars().count() > MAX_CATEGORY_CODE_LEN
        || code.chars().any(char::is_whitespace)
    {
        return Err(CategoryError::InvalidCode(code.to_string()));
    }
    Ok(code.to_string())
}

fn validate_description(description: &str) -> Result<String, CategoryError> {
    let description = description.trim();
    if description.is_empty() || description.chars().count() > MAX_CATEGORY_DESCRIPTION_LEN {
        return Err(CategoryError::InvalidDescription);
    }
    Ok(description.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = NewCategory::new(" 7 ", " Contingency ").unwrap();
        assert_eq!(category.code(), "7");
        assert_eq!(category.description(), "Contingency");
    }

    #[test]
    fn test_rejects_long_code_and_blank_description() {
        assert!(matches!(
            NewCategory::new("12345678901", "x"),
            Err(CategoryError::InvalidCode(_))
        ));
        assert!(matches!(
            NewCategory::new("1", "  "),
            Err(CategoryError::InvalidDescription)
        ));
    }

    #[test]
    fn test_update_validation() {
        let update = CategoryUpdate {
            code: Some(" 9 ".into()),
            description: None,
        }
        .validated()
        .unwrap();
        assert_eq!(update.code.as_deref(), Some("9"));
        assert!(CategoryUpdate::default().is_empty());
        assert!(
            CategoryUpdate {
                code: Some(String::new()),
                description: None
            }
            .validated()
            .is_err()
        );
    }

    #[test]
    fn test_in_use_is_conflict() {
        assert!(matches!(
            AppError::from(CategoryError::InUse("3".into())),
            AppError::Conflict(_)
        ));
    }
}
