//! WBS node and budget line input types.

use chrono::{DateTime, Utc};
use costline_shared::types::WbsNodeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::code::WbsCode;
use super::error::WbsError;
use super::status::WbsStatus;
use crate::amount::{fits_scale, line_total, within_range};

const MAX_DESCRIPTION_LEN: usize = 2000;

/// A stored budget line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbsNode {
    /// Node id.
    pub id: WbsNodeId,
    /// Parent node, `None` for a root.
    pub parent_id: Option<WbsNodeId>,
    /// Dotted code, unique per tenant.
    pub code: WbsCode,
    /// Line item description.
    pub description: String,
    /// Cost per unit.
    pub unit_cost: Decimal,
    /// Units budgeted.
    pub quantity: Decimal,
    /// Planned duration in days.
    pub duration_days: Option<i32>,
    /// `unit_cost * quantity`, persisted at creation.
    pub total_cost: Decimal,
    /// Draft lifecycle status.
    pub status: WbsStatus,
    /// Acting user who created the line.
    pub created_by: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new budget line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWbsLine {
    parent_id: Option<WbsNodeId>,
    code: WbsCode,
    description: String,
    unit_cost: Decimal,
    quantity: Decimal,
    duration_days: Option<i32>,
    total_cost: Decimal,
}

impl NewWbsLine {
    /// Validates a budget line.
    ///
    /// The parent id is checked for existence by the store, not here.
    pub fn new(
        parent_id: Option<WbsNodeId>,
        code: &str,
        description: &str,
        unit_cost: Decimal,
        quantity: Decimal,
        duration_days: Option<i32>,
    ) -> Result<Self, WbsError> {
        let code = WbsCode::parse(code.trim())?;

        let description = description.trim();
        if description.is_empty() {
            return Err(WbsError::DescriptionRequired);
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(WbsError::FieldTooLong {
                field: "description",
                max: MAX_DESCRIPTION_LEN,
            });
        }

        if unit_cost.is_sign_negative() && !unit_cost.is_zero() {
            return Err(WbsError::NegativeUnitCost);
        }
        if quantity <= Decimal::ZERO {
            return Err(WbsError::NonPositiveQuantity);
        }
        if !fits_scale(unit_cost) {
            return Err(WbsError::InvalidPrecision("unit_cost"));
        }
        if !fits_scale(quantity) {
            return Err(WbsError::InvalidPrecision("quantity"));
        }
        if !within_range(unit_cost) {
            return Err(WbsError::AmountOutOfRange("unit_cost"));
        }
        if !within_range(quantity) {
            return Err(WbsError::AmountOutOfRange("quantity"));
        }
        let total_cost =
            line_total(unit_cost, quantity).ok_or(WbsError::AmountOutOfRange("total_cost"))?;
        if duration_days.is_some_and(|days| days < 0) {
            return Err(WbsError::NegativeDuration);
        }

        Ok(Self {
            parent_id,
            code,
            description: description.to_string(),
            unit_cost,
            quantity,
            duration_days,
            total_cost,
        })
    }

    /// Parent node id.
    #[must_use]
    pub fn parent_id(&self) -> Option<WbsNodeId> {
        self.parent_id
    }

    /// Line code.
    #[must_use]
    pub fn code(&self) -> &WbsCode {
        &self.code
    }

    /// Trimmed description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Cost per unit.
    #[must_use]
    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    /// Units budgeted.
    #[must_use]
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Planned duration in days.
    #[must_use]
    pub fn duration_days(&self) -> Option<i32> {
        self.duration_days
    }

    /// Budgeted total for the line.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }
}

/// One line of a tenant seed file. Parents are referenced by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedLine {
    /// Line code.
    pub code: String,
    /// Line item description.
    pub description: String,
    /// Cost per unit.
    pub unit_cost: Decimal,
    /// Units budgeted.
    pub quantity: Decimal,
    /// Planned duration in days.
    #[serde(default)]
    pub duration_days: Option<i32>,
    /// Code of the parent line, seeded earlier or already stored.
    #[serde(default)]
    pub parent_code: Option<String>,
}

impl SeedLine {
    /// Validates this line once its parent code has been resolved to an id.
    pub fn to_line(&self, parent_id: Option<WbsNodeId>) -> Result<NewWbsLine, WbsError> {
        NewWbsLine::new(
            parent_id,
            &self.code,
            &self.description,
            self.unit_cost,
            self.quantity,
            self.duration_days,
        )
    }
}
