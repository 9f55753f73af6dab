//! Tenant identity and namespace naming.
//!
//! A tenant owns exactly one isolated namespace. The namespace name is the
//! only piece of tenant data that is ever interpolated into SQL, so it is
//! represented by [`TenantSchema`], which can only be built from a string that
//! passes the identifier rule.

pub mod error;
pub mod schema;
pub mod types;

pub use error::TenantError;
pub use schema::{MAX_SCHEMA_NAME_LEN, TenantSchema, derive_schema_name};
pub use types::{NewTenant, Tenant, TenantUpdate};
