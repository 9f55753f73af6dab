//! Rollup inputs and output rows.

use std::ops::Add;

use costline_shared::types::WbsNodeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A node as seen by the rollup engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupNode {
    /// Node id.
    pub id: WbsNodeId,
    /// Parent id as stored; may reference a missing node.
    pub parent_id: Option<WbsNodeId>,
    /// Dotted code.
    pub code: String,
    /// Line description.
    pub description: String,
    /// Budgeted total of the line itself.
    pub total_cost: Decimal,
}

/// Expense sums attributed directly to one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelfTotals {
    /// Sum of paid amounts.
    pub paid: Decimal,
    /// Sum of committed amounts.
    pub committed: Decimal,
}

impl Add for SelfTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            paid: self.paid + rhs.paid,
            committed: self.committed + rhs.committed,
        }
    }
}

/// One line of the rollup report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupRow {
    /// Node id.
    pub id: WbsNodeId,
    /// Parent id as stored.
    pub parent_id: Option<WbsNodeId>,
    /// Dotted code.
    pub code: String,
    /// Line description.
    pub description: String,
    /// Budgeted total of the line itself.
    pub total_cost_budgeted: Decimal,
    /// Paid directly against this line.
    pub total_paid_self: Decimal,
    /// Committed directly against this line.
    pub total_committed_self: Decimal,
    /// Paid against this line and all its descendants.
    pub total_paid_rollup: Decimal,
    /// Committed against this line and all its descendants.
    pub total_committed_rollup: Decimal,
}
