//! Thresholds used by the classifier.

use costline_shared::VarianceConfig;
use rust_decimal::Decimal;

/// Classification thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariancePolicy {
    /// Code of the line reserved for unbudgeted spending.
    pub unbudgeted_code: String,
    /// Paid amount above which an unbudgeted expense is major.
    pub unbudgeted_threshold: Decimal,
    /// Category overrun percentage above which an expense is major.
    pub overrun_percent_threshold: Decimal,
}

impl Default for VariancePolicy {
    fn default() -> Self {
        Self::from(&VarianceConfig::default())
    }
}

impl From<&VarianceConfig> for VariancePolicy {
    fn from(config: &VarianceConfig) -> Self {
        Self {
            unbudgeted_code: config.unbudgeted_code.clone(),
            unbudgeted_threshold: config.unbudgeted_threshold,
            overrun_percent_threshold: config.overrun_percent_threshold,
        }
    }
}
