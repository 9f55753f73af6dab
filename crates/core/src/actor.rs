//! The acting user supplied by the authentication layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use costline_shared::AppError;

const MAX_ACTOR_LEN: usize = 255;

/// Opaque identifier of the authenticated principal performing a write.
///
/// Always comes from the caller's verified context, never from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActingUser(String);

/// Invalid acting user identifier.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Acting user id must be 1-255 non-blank characters")]
pub struct InvalidActingUser;

impl ActingUser {
    /// Wraps a user id from the authentication layer.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidActingUser> {
        let id = id.into();
        if id.trim().is_empty() || id.chars().count() > MAX_ACTOR_LEN {
            return Err(InvalidActingUser);
        }
        Ok(Self(id))
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActingUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<InvalidActingUser> for AppError {
    fn from(err: InvalidActingUser) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acting_user() {
        assert_eq!(ActingUser::new("user-17").unwrap().as_str(), "user-17");
        assert_eq!(ActingUser::new("  "), Err(InvalidActingUser));
        assert_eq!(ActingUser::new("u".repeat(256)), Err(InvalidActingUser));
    }
}
