//! Dotted hierarchical WBS codes.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::WbsError;

/// Separator between code levels, as in `"1.2.1"`.
pub const CODE_SEPARATOR: char = '.';

const MAX_CODE_LEN: usize = 50;

/// A validated WBS code such as `"1.2.1"`.
///
/// Ordering is natural: numeric segments compare by value, so `"1.2"` sorts
/// before `"1.10"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WbsCode(String);

impl WbsCode {
    /// Validates a raw code.
    ///
    /// # Errors
    ///
    /// Returns `WbsError::InvalidCode` for blank codes, codes longer than 50
    /// characters, or codes containing whitespace or empty segments.
    pub fn parse(raw: &str) -> Result<Self, WbsError> {
        let valid = !raw.is_empty()
            && raw.chars().count() <= MAX_CODE_LEN
            && !raw.chars().any(|c| c.is_whitespace() || c.is_control())
            && raw.split(CODE_SEPARATOR).all(|segment| !segment.is_empty());

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(WbsError::InvalidCode(raw.to_string()))
        }
    }

    /// Returns the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Top-level grouping: the part before the first separator.
    #[must_use]
    pub fn category(&self) -> &str {
        self.0
            .split_once(CODE_SEPARATOR)
            .map_or(self.0.as_str(), |(head, _)| head)
    }

    /// True if this code equals `prefix` or starts with `prefix` followed by a separator.
    #[must_use]
    pub fn is_within(&self, prefix: &str) -> bool {
        code_is_within(&self.0, prefix)
    }
}

/// String form of [`WbsCode::is_within`], for codes read back from storage.
#[must_use]
pub fn code_is_within(code: &str, prefix: &str) -> bool {
    match code.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(CODE_SEPARATOR),
        None => false,
    }
}

/// Natural, numeric-aware code comparison.
#[must_use]
pub fn compare_codes(a: &str, b: &str) -> Ordering {
    let mut left = a.split(CODE_SEPARATOR);
    let mut right = b.split(CODE_SEPARATOR);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(ln), Ok(rn)) => ln.cmp(&rn).then_with(|| l.cmp(r)),
                    _ => l.cmp(r),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

impl Ord for WbsCode {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_codes(&self.0, &other.0)
    }
}

impl PartialOrd for WbsCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WbsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WbsCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WbsCode {
    type Error = WbsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WbsCode> for String {
    fn from(code: WbsCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2", "1.10", Ordering::Less)]
    #[case("1.10", "1.9", Ordering::Greater)]
    #[case("1", "1.0", Ordering::Less)]
    #[case("2", "10", Ordering::Less)]
    #[case("1.2.1", "1.2.1", Ordering::Equal)]
    #[case("A.1", "B.1", Ordering::Less)]
    #[case("1.a", "1.2", Ordering::Greater)]
    #[case("01", "1", Ordering::Less)]
    fn test_compare_codes(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare_codes(a, b), expected);
    }

    #[test]
    fn test_sorting_is_natural() {
        let mut codes: Vec<WbsCode> = ["1.10", "1.2", "2.0", "1.0", "1.1", "10.1", "1"]
            .into_iter()
            .map(|c| WbsCode::parse(c).unwrap())
            .collect();
        codes.sort();
        let sorted: Vec<&str> = codes.iter().map(WbsCode::as_str).collect();
        assert_eq!(sorted, ["1", "1.0", "1.1", "1.2", "1.10", "2.0", "10.1"]);
    }

    #[rstest]
    #[case("1.2.1", "1")]
    #[case("7.99", "7")]
    #[case("3", "3")]
    #[case("HR.4", "HR")]
    fn test_category(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(WbsCode::parse(code).unwrap().category(), expected);
    }

    #[test]
    fn test_is_within_requires_separator_boundary() {
        let code = WbsCode::parse("1.2.1").unwrap();
        assert!(code.is_within("1"));
        assert!(code.is_within("1.2"));
        assert!(code.is_within("1.2.1"));
        assert!(!code.is_within("1.2.10"));
        assert!(!WbsCode::parse("10.1").unwrap().is_within("1"));
        assert!(!WbsCode::parse("1.20").unwrap().is_within("1.2"));
    }

    #[rstest]
    #[case("")]
    #[case("1..2")]
    #[case(".1")]
    #[case("1.")]
    #[case("1 2")]
    fn test_rejects_malformed_codes(#[case] raw: &str) {
        assert!(matches!(WbsCode::parse(raw), Err(WbsError::InvalidCode(_))));
    }

    #[test]
    fn test_rejects_overlong_code() {
        assert!(WbsCode::parse(&"1".repeat(51)).is_err());
        assert!(WbsCode::parse(&"1".repeat(50)).is_ok());
    }

    proptest! {
        #[test]
        fn prop_compare_is_antisymmetric(
            a in prop::collection::vec(0u32..30, 1..4),
            b in prop::collection::vec(0u32..30, 1..4),
        ) {
            let a = a.iter().map(u32::to_string).collect::<Vec<_>>().join(".");
            let b = b.iter().map(u32::to_string).collect::<Vec<_>>().join(".");
            prop_assert_eq!(compare_codes(&a, &b), compare_codes(&b, &a).reverse());
            prop_assert_eq!(compare_codes(&a, &b) == Ordering::Equal, a == b);
        }
    }
}
