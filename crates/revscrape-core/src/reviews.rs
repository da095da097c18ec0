use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Site identifier stamped on every record.
pub const REVIEW_SOURCE: &str = "Capterra";

/// One review extracted from a listing page.
///
/// Field names serialize to the keys of the exported JSON file
/// (`review_date`, `page`) that downstream consumers read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub reviewer_name: String,
    pub review_title: String,
    #[serde(rename = "review_date")]
    pub review_date_raw: String,
    pub parsed_date: Option<NaiveDate>,
    pub rating: f64,
    pub content: String,
    pub pros: String,
    pub cons: String,
    #[serde(rename = "page")]
    pub page_number: u32,
    pub source: String,
}

/// Inclusive calendar-date window used to filter reviews.
///
/// Can only be built through [`DateRange::new`] or [`DateRange::from_bounds`],
/// which guarantee `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvertedDateRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvertedDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds an optional range from optional boundaries: both absent means
    /// no filtering, both present means a validated range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IncompleteDateRange`] when exactly one boundary
    /// is given, or [`ConfigError::InvertedDateRange`] when `start > end`.
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<Self>, ConfigError> {
        match (start, end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            _ => Err(ConfigError::IncompleteDateRange),
        }
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether a review with this parsed date passes the filter. Reviews
    /// whose date could not be parsed never pass.
    #[must_use]
    pub fn admits(&self, parsed_date: Option<NaiveDate>) -> bool {
        parsed_date.is_some_and(|d| self.contains(d))
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
