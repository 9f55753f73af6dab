//! Budget draft lifecycle.
//!
//! ```text
//! pending ──approve──▶ approved
//!    │
//!    └────reject────▶ rejected
//! ```
//!
//! Both terminal states are final. Repeating the transition that produced the
//! current state is accepted as a no-op.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::WbsError;

/// Status of a WBS budget line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WbsStatus {
    /// Awaiting a decision.
    Pending,
    /// Accepted into the budget.
    Approved,
    /// Declined.
    Rejected,
}

impl WbsStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a stored status.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// True for approved and rejected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for WbsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a permitted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The node moves to the new status and must be written.
    Applied(WbsStatus),
    /// The node already has the requested status; nothing to write.
    Unchanged,
}

/// Stateless transition rules for budget drafts.
pub struct DraftWorkflow;

impl DraftWorkflow {
    /// Approve a draft.
    ///
    /// # Errors
    ///
    /// Returns `WbsError::InvalidTransition` if the node was rejected.
    pub fn approve(current: WbsStatus) -> Result<StatusChange, WbsError> {
        Self::transition(current, WbsStatus::Approved)
    }

    /// Reject a draft.
    ///
    /// # Errors
    ///
    /// Returns `WbsError::InvalidTransition` if the node was approved.
    pub fn reject(current: WbsStatus) -> Result<StatusChange, WbsError> {
        Self::transition(current, WbsStatus::Rejected)
    }

    fn transition(current: WbsStatus, target: WbsStatus) -> Result<StatusChange, WbsError> {
        match current {
            WbsStatus::Pending => Ok(StatusChange::Applied(target)),
            same if same == target => Ok(StatusChange::Unchanged),
            _ => Err(WbsError::InvalidTransition {
                from: current,
                to: target,
            }),
        }
    }
}
