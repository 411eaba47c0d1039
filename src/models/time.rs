//! Request date-range parsing.
//!
//! Upstream queries accept an absent range (defaulting to the trailing
//! 30 days), the literal token `today`, a `yrN` shorthand for the last
//! N years, or exact `yyyy-MM-dd` dates. Malformed input is a hard
//! error surfaced to the caller; it is never silently replaced with a
//! default.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use thiserror::Error;

/// Number of days covered when no range is requested.
const DEFAULT_RANGE_DAYS: i64 = 30;

#[derive(Debug, Error, PartialEq)]
pub enum DateParseError {
    #[error("invalid start date {0:?}: expected yyyy-MM-dd, \"today\" or \"yrN\"")]
    InvalidStart(String),
    #[error("invalid end date {0:?}: expected yyyy-MM-dd")]
    InvalidEnd(String),
    #[error("invalid year count in {0:?}: expected yrN with numeric N")]
    InvalidYearShorthand(String),
}

/// A resolved inclusive date range for upstream fetches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Parse the `startDate`/`endDate` query parameters.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, DateParseError> {
        Self::parse_at(start, end, Utc::now())
    }

    /// As [`DateRange::parse`] but against an explicit "now", so the
    /// relative forms are testable.
    pub fn parse_at(
        start: Option<&str>,
        end: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, DateParseError> {
        let start = start.filter(|s| !s.is_empty());
        let end = end.filter(|s| !s.is_empty());

        match start {
            None if end.is_none() => Ok(Self {
                start: now - Duration::days(DEFAULT_RANGE_DAYS),
                end: now,
            }),
            Some(s) if s.eq_ignore_ascii_case("today") => Ok(Self { start: now, end: now }),
            // get() instead of slicing: the value is caller-controlled
            // and may put a multi-byte character across the boundary.
            Some(s) if s.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("yr")) => {
                let years: u32 = s[2..]
                    .parse()
                    .map_err(|_| DateParseError::InvalidYearShorthand(s.to_string()))?;
                Ok(Self {
                    start: now - Months::new(12 * years),
                    end: now,
                })
            }
            _ => {
                let start = match start {
                    Some(s) => parse_exact(s).ok_or_else(|| DateParseError::InvalidStart(s.to_string()))?,
                    None => now - Duration::days(DEFAULT_RANGE_DAYS),
                };
                let end = match end {
                    Some(e) => parse_exact(e).ok_or_else(|| DateParseError::InvalidEnd(e.to_string()))?,
                    None => now,
                };
                Ok(Self { start, end })
            }
        }
    }

    /// Render a bound the way the DONKI API expects it.
    pub fn format_bound(t: DateTime<Utc>) -> String {
        t.format("%Y-%m-%d").to_string()
    }
}

fn parse_exact(s: &str) -> Option<DateTime<Utc>> {
    // Length precheck mirrors the strictness of the query contract:
    // "2024-5-1" is rejected even though chrono could parse it.
    if s.len() != 10 {
        return None;
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0)?,
        Utc,
    ))
}
