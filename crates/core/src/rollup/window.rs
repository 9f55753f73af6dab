//! Inclusive expense date window for rollup reads.

use chrono::NaiveDate;
use costline_shared::AppError;
use thiserror::Error;

/// Window whose start falls after its end.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Start date {start} is after end date {end}")]
pub struct InvalidDateWindow {
    /// Requested start.
    pub start: NaiveDate,
    /// Requested end.
    pub end: NaiveDate,
}

impl From<InvalidDateWindow> for AppError {
    fn from(err: InvalidDateWindow) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Closed date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Builds a window.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateWindow> {
        if start > end {
            return Err(InvalidDateWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day included.
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day included.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// True if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
