//! Expense value objects.

use chrono::{DateTime, NaiveDate, Utc};
use costline_shared::types::WbsNodeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ExpenseError;
use crate::amount::{fits_scale, within_range};
use crate::variance::VarianceFlag;

const MAX_DESCRIPTION_LEN: usize = 2000;
const MAX_DOCUMENT_REFERENCE_LEN: usize = 255;
const MAX_NOTES_LEN: usize = 4000;

/// A recorded expense. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// Monotonic entry id.
    pub id: i64,
    /// Budget line charged.
    pub wbs_id: WbsNodeId,
    /// Acting user who recorded the expense.
    pub user_id: String,
    /// Date the expense was incurred.
    pub expense_date: NaiveDate,
    /// What was bought.
    pub item_description: String,
    /// Actual cost per unit.
    pub unit_cost: Decimal,
    /// Actual units.
    pub quantity: Decimal,
    /// Committed (purchase order) amount.
    pub commitment_amount: Decimal,
    /// Amount actually paid.
    pub paid_amount: Decimal,
    /// Invoice or receipt reference.
    pub document_reference: Option<String>,
    /// Justification notes.
    pub notes: Option<String>,
    /// Classification computed when the entry was recorded.
    pub variance_flag: VarianceFlag,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new expense.
///
/// The acting user is not part of the input; the ledger takes it separately
/// from the caller's authenticated context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    wbs_id: WbsNodeId,
    expense_date: Option<NaiveDate>,
    item_description: String,
    unit_cost: Decimal,
    quantity: Decimal,
    commitment_amount: Decimal,
    paid_amount: Decimal,
    document_reference: Option<String>,
    notes: Option<String>,
}

impl NewExpense {
    /// Validates the required fields. Commitment defaults to zero.
    pub fn new(
        wbs_id: WbsNodeId,
        item_description: &str,
        unit_cost: Decimal,
        quantity: Decimal,
        paid_amount: Decimal,
    ) -> Result<Self, ExpenseError> {
        let item_description = item_description.trim();
        if item_description.is_empty() {
            return Err(ExpenseError::DescriptionRequired);
        }
        check_len("item_description", item_description, MAX_DESCRIPTION_LEN)?;
        check_amount("unit_cost", unit_cost)?;
        check_amount("paid_amount", paid_amount)?;
        if quantity <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveQuantity);
        }
        if !fits_scale(quantity) {
            return Err(ExpenseError::InvalidPrecision("quantity"));
        }
        if !within_range(quantity) {
            return Err(ExpenseError::AmountOutOfRange("quantity"));
        }

        Ok(Self {
            wbs_id,
            expense_date: None,
            item_description: item_description.to_string(),
            unit_cost,
            quantity,
            commitment_amount: Decimal::ZERO,
            paid_amount,
            document_reference: None,
            notes: None,
        })
    }

    /// Sets the committed amount.
    pub fn with_commitment(mut self, amount: Decimal) -> Result<Self, ExpenseError> {
        check_amount("commitment_amount", amount)?;
        self.commitment_amount = amount;
        Ok(self)
    }

    /// Sets the expense date. Defaults to the current date when recorded.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.expense_date = Some(date);
        self
    }

    /// Sets the document reference. Blank values are dropped.
    pub fn with_document_reference(mut self, reference: &str) -> Result<Self, ExpenseError> {
        self.document_reference = optional_text(
            "document_reference",
            reference,
            MAX_DOCUMENT_REFERENCE_LEN,
        )?;
        Ok(self)
    }

    /// Sets the justification notes. Blank values are dropped.
    pub fn with_notes(mut self, notes: &str) -> Result<Self, ExpenseError> {
        self.notes = optional_text("notes", notes, MAX_NOTES_LEN)?;
        Ok(self)
    }

    /// Budget line charged.
    #[must_use]
    pub fn wbs_id(&self) -> WbsNodeId {
        self.wbs_id
    }

    /// Explicit expense date, if any.
    #[must_use]
    pub fn expense_date(&self) -> Option<NaiveDate> {
        self.expense_date
    }

    /// Item description.
    #[must_use]
    pub fn item_description(&self) -> &str {
        &self.item_description
    }

    /// Cost per unit.
    #[must_use]
    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    /// Units.
    #[must_use]
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Committed amount.
    #[must_use]
    pub fn commitment_amount(&self) -> Decimal {
        self.commitment_amount
    }

    /// Paid amount.
    #[must_use]
    pub fn paid_amount(&self) -> Decimal {
        self.paid_amount
    }

    /// Document reference.
    #[must_use]
    pub fn document_reference(&self) -> Option<&str> {
        self.document_reference.as_deref()
    }

    /// Notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

fn check_amount(field: &'static str, value: Decimal) -> Result<(), ExpenseError> {
    if value < Decimal::ZERO {
        return Err(ExpenseError::NegativeAmount(field));
    }
    if !fits_scale(value) {
        return Err(ExpenseError::InvalidPrecision(field));
    }
    if !within_range(value) {
        return Err(ExpenseError::AmountOutOfRange(field));
    }
    Ok(())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ExpenseError> {
    if value.chars().count() > max {
        return Err(ExpenseError::FieldTooLong { field, max });
    }
    Ok(())
}

fn optional_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<Option<String>, ExpenseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    check_len(field, value, max)?;
    Ok(Some(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use costline_shared::AppError;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn expense(paid: Decimal) -> Result<NewExpense, ExpenseError> {
        NewExpense::new(WbsNodeId::new(), "Cement", dec!(100), dec!(5), paid)
    }

    #[test]
    fn test_defaults() {
        let expense = expense(dec!(500)).unwrap();
        assert_eq!(expense.commitment_amount(), Decimal::ZERO);
        assert_eq!(expense.expense_date(), None);
        assert_eq!(expense.document_reference(), None);
    }

    #[test]
    fn test_rejects_negative_and_zero_values() {
        assert!(matches!(
            expense(dec!(-1)),
            Err(ExpenseError::NegativeAmount("paid_amount"))
        ));
        assert!(matches!(
            NewExpense::new(WbsNodeId::new(), "Cement", dec!(1), dec!(0), dec!(1)),
            Err(ExpenseError::NonPositiveQuantity)
        ));
        assert!(matches!(
            expense(dec!(1)).unwrap().with_commitment(dec!(-5)),
            Err(ExpenseError::NegativeAmount("commitment_amount"))
        ));
    }

    #[test]
    fn test_zero_paid_is_allowed() {
        assert!(expense(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_optional_text_fields() {
        let expense = expense(dec!(1))
            .unwrap()
            .with_document_reference("  INV-204 ")
            .unwrap()
            .with_notes("   ")
            .unwrap();
        assert_eq!(expense.document_reference(), Some("INV-204"));
        assert_eq!(expense.notes(), None);

        assert!(matches!(
            expense.with_document_reference(&"x".repeat(256)),
            Err(ExpenseError::FieldTooLong { max: 255, .. })
        ));
    }

    #[test]
    fn test_rejects_excess_precision() {
        assert!(matches!(
            expense(dec!(1.00001)),
            Err(ExpenseError::InvalidPrecision("paid_amount"))
        ));
    }

    #[rstest]
    #[case(dec!(1000000000000000), dec!(1), dec!(1), "unit_cost")]
    #[case(dec!(1), dec!(1000000000000000), dec!(1), "quantity")]
    #[case(dec!(1), dec!(1), dec!(1000000000000000), "paid_amount")]
    fn test_rejects_amounts_beyond_storage_range(
        #[case] unit_cost: Decimal,
        #[case] quantity: Decimal,
        #[case] paid: Decimal,
        #[case] field: &str,
    ) {
        let err = NewExpense::new(WbsNodeId::new(), "Crane", unit_cost, quantity, paid).unwrap_err();
        assert!(matches!(err, ExpenseError::AmountOutOfRange(f) if f == field));
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
    }

    #[test]
    fn test_commitment_beyond_storage_range() {
        assert!(matches!(
            expense(dec!(1)).unwrap().with_commitment(dec!(1000000000000000)),
            Err(ExpenseError::AmountOutOfRange("commitment_amount"))
        ));
        assert!(expense(dec!(999999999999999.9999)).is_ok());
    }
}
