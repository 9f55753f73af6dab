//! Validated tenant namespace identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TenantError;

/// PostgreSQL identifier length limit in bytes.
pub const MAX_SCHEMA_NAME_LEN: usize = 63;

const RESERVED_SCHEMA_NAMES: [&str; 2] = ["public", "information_schema"];
const SYSTEM_SCHEMA_PREFIX: &str = "pg_";

/// A namespace identifier that is safe to interpolate into SQL.
///
/// Only lowercase ASCII letters, digits, and underscores are admitted, so the
/// value can never carry quotes, semicolons, or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantSchema(String);

impl TenantSchema {
    /// Validates a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::InvalidSchemaName` if the identifier is empty,
    /// longer than 63 bytes, or contains anything outside `[a-z0-9_]`.
    pub fn parse(raw: &str) -> Result<Self, TenantError> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_SCHEMA_NAME_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(TenantError::InvalidSchemaName(raw.to_string()))
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `public`, `information_schema` and any `pg_` namespace.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        RESERVED_SCHEMA_NAMES.contains(&self.0.as_str()) || self.0.starts_with(SYSTEM_SCHEMA_PREFIX)
    }

    /// Returns the identifier wrapped in double quotes for SQL.
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for TenantSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantSchema {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TenantSchema {
    type Err = TenantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TenantSchema {
    type Error = TenantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantSchema> for String {
    fn from(schema: TenantSchema) -> Self {
        schema.0
    }
}

/// Derives a namespace name from a tenant display name.
///
/// Lowercases the name, replaces every character outside `[a-z0-9_]` with an
/// underscore, and truncates to the identifier limit.
///
/// # Errors
///
/// - `TenantError::NameRequired` for a blank name
/// - `TenantError::ReservedSchemaName` if the result names a system namespace
pub fn derive_schema_name(name: &str) -> Result<TenantSchema, TenantError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TenantError::NameRequired);
    }

    let derived: String = trimmed
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_SCHEMA_NAME_LEN)
        .collect();

    let schema = TenantSchema::parse(&derived)?;
    if schema.is_reserved() {
        return Err(TenantError::ReservedSchemaName(derived));
    }
    Ok(schema)
}
