//! Monetary and quantity checks shared by budget lines and expenses.
//!
//! Amounts are stored as `NUMERIC(19,4)`, so any value with more than four
//! significant fraction digits is rejected instead of silently rounded, and
//! any value beyond 15 integer digits is rejected before it reaches
//! arithmetic.

use rust_decimal::Decimal;

/// Fraction digits kept for every stored amount and quantity.
pub const AMOUNT_SCALE: u32 = 4;

/// Largest magnitude a `NUMERIC(19,4)` column holds: `999999999999999.9999`.
pub const MAX_AMOUNT: Decimal =
    Decimal::from_parts(0x89E7_FFFF, 0x8AC7_2304, 0, false, AMOUNT_SCALE);

/// Returns true if `value` fits in four fraction digits.
#[must_use]
pub fn fits_scale(value: Decimal) -> bool {
    value.normalize().scale() <= AMOUNT_SCALE
}

/// Returns true if `value` fits the storage column's integer digits.
#[must_use]
pub fn within_range(value: Decimal) -> bool {
    value.abs() <= MAX_AMOUNT
}

/// Returns `unit_cost * quantity` at storage precision, or `None` if the
/// product does not fit the storage column.
#[must_use]
pub fn line_total(unit_cost: Decimal, quantity: Decimal) -> Option<Decimal> {
    unit_cost
        .checked_mul(quantity)
        .map(|total| total.round_dp(AMOUNT_SCALE))
        .filter(|total| within_range(*total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fits_scale() {
        assert!(fits_scale(dec!(1000)));
        assert!(fits_scale(dec!(0.1234)));
        assert!(fits_scale(dec!(2.50000000)));
        assert!(!fits_scale(dec!(0.12345)));
    }

    #[test]
    fn test_max_amount_matches_column() {
        assert_eq!(MAX_AMOUNT, dec!(999999999999999.9999));
    }

    #[rstest]
    #[case(dec!(0), true)]
    #[case(dec!(999999999999999.9999), true)]
    #[case(dec!(-999999999999999.9999), true)]
    #[case(dec!(1000000000000000), false)]
    #[case(dec!(79228162514264337593543950335), false)]
    fn test_within_range(#[case] value: Decimal, #[case] expected: bool) {
        assert_eq!(within_range(value), expected);
    }

    #[rstest]
    #[case(dec!(1000), dec!(2), Some(dec!(2000)))]
    #[case(dec!(0.3333), dec!(3), Some(dec!(0.9999)))]
    #[case(dec!(1.2345), dec!(1.5), Some(dec!(1.8518)))]
    #[case(dec!(999999999999999.9999), dec!(1), Some(dec!(999999999999999.9999)))]
    #[case(dec!(100000000000000), dec!(10), None)]
    #[case(dec!(999999999999999), dec!(999999999999999), None)]
    #[case(dec!(79228162514264337593543950335), dec!(2), None)]
    fn test_line_total(
        #[case] unit_cost: Decimal,
        #[case] quantity: Decimal,
        #[case] expected: Option<Decimal>,
    ) {
        assert_eq!(line_total(unit_cost, quantity), expected);
    }
}
