//! Variance flags stored on expense entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of classifying one expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VarianceFlag {
    /// Paid amount equals the line budget.
    NoVariance,
    /// Paid amount is below the line budget.
    PositiveVariance,
    /// Paid amount is above the line budget.
    NegativeVariance,
    /// Large payment against the reserved unbudgeted line.
    MajorVarianceUnbudgeted,
    /// Category spending exceeds its budget by more than the threshold.
    MajorVarianceOverrun,
}

impl VarianceFlag {
    /// Flags that require review.
    pub const MAJOR: [Self; 2] = [Self::MajorVarianceUnbudgeted, Self::MajorVarianceOverrun];

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoVariance => "NO_VARIANCE",
            Self::PositiveVariance => "POSITIVE_VARIANCE",
            Self::NegativeVariance => "NEGATIVE_VARIANCE",
            Self::MajorVarianceUnbudgeted => "MAJOR_VARIANCE_UNBUDGETED",
            Self::MajorVarianceOverrun => "MAJOR_VARIANCE_OVERRUN",
        }
    }

    /// Parses a stored flag.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NO_VARIANCE" => Some(Self::NoVariance),
            "POSITIVE_VARIANCE" => Some(Self::PositiveVariance),
            "NEGATIVE_VARIANCE" => Some(Self::NegativeVariance),
            "MAJOR_VARIANCE_UNBUDGETED" => Some(Self::MajorVarianceUnbudgeted),
            "MAJOR_VARIANCE_OVERRUN" => Some(Self::MajorVarianceOverrun),
            _ => None,
        }
    }

    /// True for the flags that require review.
    #[must_use]
    pub const fn is_major(&self) -> bool {
        matches!(
            self,
            Self::MajorVarianceUnbudgeted | Self::MajorVarianceOverrun
        )
    }
}

impl fmt::Display for VarianceFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
