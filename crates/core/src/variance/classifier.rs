//! Line and category variance checks.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::flag::VarianceFlag;
use super::policy::VariancePolicy;
use crate::wbs::WbsCode;

/// Category totals read inside the recording transaction, before the new
/// expense is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryTotals {
    /// Sum of `total_cost` over every line in the category.
    pub budgeted: Decimal,
    /// Sum of paid amounts already recorded in the category.
    pub prior_paid: Decimal,
}

/// Classifies new expenses under a [`VariancePolicy`].
#[derive(Debug, Clone, Default)]
pub struct VarianceClassifier {
    policy: VariancePolicy,
}

impl VarianceClassifier {
    /// Creates a classifier.
    #[must_use]
    pub fn new(policy: VariancePolicy) -> Self {
        Self { policy }
    }

    /// Returns the active policy.
    #[must_use]
    pub fn policy(&self) -> &VariancePolicy {
        &self.policy
    }

    /// Sign of `line_budget - paid`.
    #[must_use]
    pub fn base_flag(line_budget: Decimal, paid: Decimal) -> VarianceFlag {
        match (line_budget - paid).cmp(&Decimal::ZERO) {
            Ordering::Greater => VarianceFlag::PositiveVariance,
            Ordering::Less => VarianceFlag::NegativeVariance,
            Ordering::Equal => VarianceFlag::NoVariance,
        }
    }

    /// Line-level checks: base flag, overridden by the unbudgeted rule.
    ///
    /// A major result here is final and the category totals need not be read.
    #[must_use]
    pub fn classify_line(&self, code: &WbsCode, line_budget: Decimal, paid: Decimal) -> VarianceFlag {
        if code.as_str() == self.policy.unbudgeted_code && paid > self.policy.unbudgeted_threshold {
            return VarianceFlag::MajorVarianceUnbudgeted;
        }
        Self::base_flag(line_budget, paid)
    }

    /// Category-level check applied to a line flag.
    ///
    /// The paid total includes `paid`. A zero category budget yields a zero
    /// percentage, so it never produces an overrun.
    #[must_use]
    pub fn apply_category(
        &self,
        line_flag: VarianceFlag,
        totals: CategoryTotals,
        paid: Decimal,
    ) -> VarianceFlag {
        if line_flag.is_major() {
            return line_flag;
        }

        let paid_total = totals.prior_paid + paid;
        let percent = Self::variance_percent(totals.budgeted, paid_total);

        if percent.abs() > self.policy.overrun_percent_threshold && paid_total > totals.budgeted {
            VarianceFlag::MajorVarianceOverrun
        } else {
            line_flag
        }
    }

    /// Full classification when the category totals are already known.
    #[must_use]
    pub fn classify(
        &self,
        code: &WbsCode,
        line_budget: Decimal,
        paid: Decimal,
        totals: CategoryTotals,
    ) -> VarianceFlag {
        let line_flag = self.classify_line(code, line_budget, paid);
        self.apply_category(line_flag, totals, paid)
    }

    /// `(budgeted - paid) / budgeted * 100`, zero when nothing is budgeted.
    #[must_use]
    pub fn variance_percent(budgeted: Decimal, paid: Decimal) -> Decimal {
        if budgeted.is_zero() {
            Decimal::ZERO
        } else {
            (budgeted - paid) / budgeted * Decimal::ONE_HUNDRED
        }
    }
}
