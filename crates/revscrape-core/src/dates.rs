//! Date normalization for scraped review dates and CLI range boundaries.
//!
//! Both entry points try an ordered list of `chrono` formats and accept the
//! first one that consumes the whole input. `chrono` accepts 1–4 digit years
//! for `%Y`, so every format also declares the exact width of its year token
//! and is skipped when the input's year token has a different width. Without
//! that guard `"09/05/23"` would parse as the year 23 under `%d/%m/%Y` and the
//! two-digit `%y` variants would never be reached.

use chrono::{DateTime, NaiveDate};

use crate::ConfigError;

struct DateFormat {
    pattern: &'static str,
    year_digits: usize,
}

/// Formats for dates as they appear on review cards, in priority order.
///
/// [`parse_flexible_date`] accepts one more format after these: an RFC 3339
/// timestamp such as `2023-03-09T10:15:00Z`, the shape `<time datetime>`
/// attributes use, reduced to its calendar date. It is handled separately
/// because it carries a time and an offset.
const REVIEW_DATE_FORMATS: [DateFormat; 5] = [
    DateFormat {
        pattern: "%d %B %Y",
        year_digits: 4,
    },
    DateFormat {
        pattern: "%B %d %Y",
        year_digits: 4,
    },
    DateFormat {
        pattern: "%d/%m/%Y",
        year_digits: 4,
    },
    DateFormat {
        pattern: "%m/%d/%Y",
        year_digits: 4,
    },
    DateFormat {
        pattern: "%Y-%m-%d",
        year_digits: 4,
    },
];

/// Formats accepted for `--start-date` / `--end-date`, in priority order.
/// Day-first wins over month-first when both would be valid.
const CLI_DATE_FORMATS: [DateFormat; 4] = [
    DateFormat {
        pattern: "%d/%m/%Y",
        year_digits: 4,
    },
    DateFormat {
        pattern: "%d/%m/%y",
        year_digits: 2,
    },
    DateFormat {
        pattern: "%m/%d/%Y",
        year_digits: 4,
    },
    DateFormat {
        pattern: "%m/%d/%y",
        year_digits: 2,
    },
];

/// Parses a review date such as `"9 March 2023"`, `"March 9, 2023"`,
/// `"09/03/2023"` or `"2023-03-09"` into a calendar date.
///
/// Commas and surrounding whitespace are removed first. Returns `None` when no
/// known format matches; that is an expected outcome for unstable markup, not
/// a fault. An RFC 3339 timestamp (as found in `<time datetime="...">`) is
/// accepted as a last resort and reduced to its calendar date.
#[must_use]
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let cleaned = text.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(date) = first_matching_format(cleaned, &REVIEW_DATE_FORMATS) {
        return Some(date);
    }

    // Sixth format: RFC 3339 timestamp.
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(timestamp.date_naive());
    }

    tracing::debug!(raw = text, "could not parse review date");
    None
}

/// Parses a date-range boundary given on the command line, e.g.
/// `"09/05/2023"`, `"9/5/23"` or `"9//5/2023"` (runs of `/` are collapsed).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDate`] when no supported format matches.
/// The caller cannot build a date range without valid boundaries, so this is
/// fatal for the run.
pub fn parse_cli_date(text: &str) -> Result<NaiveDate, ConfigError> {
    let cleaned = collapse_slashes(text.trim());
    first_matching_format(&cleaned, &CLI_DATE_FORMATS).ok_or_else(|| ConfigError::InvalidDate {
        input: text.to_string(),
    })
}

fn first_matching_format(cleaned: &str, formats: &[DateFormat]) -> Option<NaiveDate> {
    let year_digits = longest_digit_run(cleaned);
    formats
        .iter()
        .filter(|format| format.year_digits == year_digits)
        .find_map(|format| NaiveDate::parse_from_str(cleaned, format.pattern).ok())
}

/// Day and month tokens are at most two digits, so the longest digit run is
/// the year token whenever the input is a well-formed date.
fn longest_digit_run(s: &str) -> usize {
    s.split(|c: char| !c.is_ascii_digit())
        .map(str::len)
        .max()
        .unwrap_or(0)
}

fn collapse_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}
