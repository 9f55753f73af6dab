//! Tenant registry types.

use chrono::{DateTime, Utc};
use costline_shared::types::TenantId;
use serde::{Deserialize, Serialize};

use super::error::TenantError;
use super::schema::{TenantSchema, derive_schema_name};

const MAX_NAME_LEN: usize = 255;

/// A registered tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant ID.
    pub id: TenantId,
    /// Unique tenant name.
    pub name: String,
    /// Human-readable project name.
    pub project_name: String,
    /// Isolated namespace owned by this tenant.
    pub schema_name: TenantSchema,
    /// When the tenant was registered.
    pub created_at: DateTime<Utc>,
}

/// Validated input for registering a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    name: String,
    project_name: String,
    schema_name: TenantSchema,
}

impl NewTenant {
    /// Validates the input and derives the namespace name.
    pub fn new(name: &str, project_name: &str) -> Result<Self, TenantError> {
        let name = validate_name(name)?;
        let project_name = validate_project_name(project_name)?;
        let schema_name = derive_schema_name(&name)?;

        Ok(Self {
            name,
            project_name,
            schema_name,
        })
    }

    /// Tenant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project name.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Derived namespace name.
    #[must_use]
    pub fn schema_name(&self) -> &TenantSchema {
        &self.schema_name
    }
}

/// Partial update of a tenant's descriptive fields.
///
/// The namespace name is fixed at registration and is not updatable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantUpdate {
    /// New tenant name.
    pub name: Option<String>,
    /// New project name.
    pub project_name: Option<String>,
}

impl TenantUpdate {
    /// Validates whichever fields are present.
    pub fn validated(self) -> Result<Self, TenantError> {
        Ok(Self {
            name: self.name.as_deref().map(validate_name).transpose()?,
            project_name: self
                .project_name
                .as_deref()
                .map(validate_project_name)
                .transpose()?,
        })
    }
}

fn validate_name(name: &str) -> Result<String, TenantError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TenantError::NameRequired);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(TenantError::FieldTooLong {
            field: "name",
            max: MAX_NAME_LEN,
        });
    }
    Ok(name.to_string())
}

fn validate_project_name(project_name: &str) -> Result<String, TenantError> {
    let project_name = project_name.trim();
    if project_name.is_empty() {
        return Err(TenantError::ProjectNameRequired);
    }
    if project_name.chars().count() > MAX_NAME_LEN {
        return Err(TenantError::FieldTooLong {
            field: "project_name",
            max: MAX_NAME_LEN,
        });
    }
    Ok(project_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tenant_derives_schema() {
        let tenant = NewTenant::new("  Lagos Bridge ", "Bridge Rehab 2026").unwrap();
        assert_eq!(tenant.name(), "Lagos Bridge");
        assert_eq!(tenant.project_name(), "Bridge Rehab 2026");
        assert_eq!(tenant.schema_name().as_str(), "lagos_bridge");
    }

    #[test]
    fn test_new_tenant_requires_fields() {
        assert!(matches!(
            NewTenant::new("", "p"),
            Err(TenantError::NameRequired)
        ));
        assert!(matches!(
            NewTenant::new("n", " "),
            Err(TenantError::ProjectNameRequired)
        ));
    }

    #[test]
    fn test_new_tenant_rejects_shared_namespace_name() {
        let err = NewTenant::new("Public", "Pier 4").unwrap_err();
        assert!(matches!(err, TenantError::ReservedSchemaName(ref s) if s == "public"));
        assert!(matches!(
            costline_shared::AppError::from(err),
            costline_shared::AppError::Validation(_)
        ));
    }

    #[test]
    fn test_new_tenant_rejects_long_name() {
        let long = "n".repeat(256);
        assert!(matches!(
            NewTenant::new(&long, "p"),
            Err(TenantError::FieldTooLong { field: "name", .. })
        ));
    }

    #[test]
    fn test_update_validates_present_fields_only() {
        let update = TenantUpdate {
            name: None,
            project_name: Some(" Phase 2 ".to_string()),
        }
        .validated()
        .unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.project_name.as_deref(), Some("Phase 2"));

        let bad = TenantUpdate {
            name: Some(String::new()),
            project_name: None,
        };
        assert!(bad.validated().is_err());
    }
}
