//! Generic filter/order/group utilities over event lists.
//!
//! The surrounding API lets callers name fields at the query boundary.
//! Instead of reflection, each entity kind carries an explicit registry
//! mapping the allowed wire-level field names to typed getters; unknown
//! names are rejected with a descriptive error up front instead of
//! silently matching nothing.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{CmeEvent, FlareEvent};
use crate::services::analysis::resolve_cme_speed;

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("unknown field {field:?}; allowed fields: {allowed}")]
    UnknownField { field: String, allowed: String },
    #[error("invalid filter {0:?}: expected \"field=value\"")]
    InvalidFilter(String),
    #[error("invalid sort direction {0:?}: expected \"asc\" or \"desc\"")]
    InvalidDirection(String),
}

/// A field value extracted from an entity, typed for comparison and
/// rendered for filtering/grouping.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Time(DateTime<Utc>),
    Missing,
}

impl FieldValue {
    /// Render for filter matching and group keys.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            FieldValue::Time(t) => t.to_rfc3339(),
            FieldValue::Missing => String::new(),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Number(a), Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Time(a), Time(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            // Missing sorts before everything; mixed types fall back to
            // the rendered form.
            (Missing, Missing) => Ordering::Equal,
            (Missing, _) => Ordering::Less,
            (_, Missing) => Ordering::Greater,
            (a, b) => a.render().cmp(&b.render()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(raw: Option<&str>) -> Result<Self, QueryError> {
        match raw {
            None => Ok(SortDirection::Ascending),
            Some(s) if s.eq_ignore_ascii_case("asc") => Ok(SortDirection::Ascending),
            Some(s) if s.eq_ignore_ascii_case("desc") => Ok(SortDirection::Descending),
            Some(other) => Err(QueryError::InvalidDirection(other.to_string())),
        }
    }
}

type Getter<T> = fn(&T) -> FieldValue;

/// Allowed field names and their getters for one entity kind.
pub struct FieldRegistry<T: 'static> {
    fields: &'static [(&'static str, Getter<T>)],
}

impl<T> FieldRegistry<T> {
    fn getter(&self, field: &str) -> Result<Getter<T>, QueryError> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, getter)| *getter)
            .ok_or_else(|| QueryError::UnknownField {
                field: field.to_string(),
                allowed: self
                    .fields
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Apply `field=value` filters. A row matches when the rendered
    /// field value contains the filter value, case-insensitively;
    /// missing values never match.
    pub fn filter(&self, items: Vec<T>, specs: &[String]) -> Result<Vec<T>, QueryError> {
        let mut parsed = Vec::with_capacity(specs.len());
        for spec in specs {
            let (field, value) = spec
                .split_once('=')
                .ok_or_else(|| QueryError::InvalidFilter(spec.clone()))?;
            parsed.push((self.getter(field)?, value.to_lowercase()));
        }
        Ok(items
            .into_iter()
            .filter(|item| {
                parsed.iter().all(|(getter, value)| {
                    let rendered = getter(item).render().to_lowercase();
                    !rendered.is_empty() && rendered.contains(value)
                })
            })
            .collect())
    }

    /// Stable sort by one field.
    pub fn order(
        &self,
        items: &mut [T],
        field: &str,
        direction: SortDirection,
    ) -> Result<(), QueryError> {
        let getter = self.getter(field)?;
        items.sort_by(|a, b| {
            let ordering = getter(a).compare(&getter(b));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        Ok(())
    }

    /// Rendered value -> row count; missing values group under "".
    pub fn group_counts(
        &self,
        items: &[T],
        field: &str,
    ) -> Result<BTreeMap<String, usize>, QueryError> {
        let getter = self.getter(field)?;
        let mut counts = BTreeMap::new();
        for item in items {
            *counts.entry(getter(item).render()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Number of rows with a present (non-missing) value for the field.
    pub fn count_of(&self, items: &[T], field: &str) -> Result<usize, QueryError> {
        let getter = self.getter(field)?;
        Ok(items
            .iter()
            .filter(|item| getter(item) != FieldValue::Missing)
            .count())
    }
}

fn opt_time(t: Option<DateTime<Utc>>) -> FieldValue {
    t.map_or(FieldValue::Missing, FieldValue::Time)
}

fn opt_region(n: Option<i64>) -> FieldValue {
    n.map_or(FieldValue::Missing, |n| FieldValue::Number(n as f64))
}

/// Queryable fields of a flare, under their DONKI wire names.
pub const FLARE_REGISTRY: FieldRegistry<FlareEvent> = FieldRegistry {
    fields: &[
        ("flrID", |f| FieldValue::Text(f.flr_id.clone())),
        ("beginTime", |f| opt_time(f.begin_time)),
        ("peakTime", |f| opt_time(f.peak_time)),
        ("endTime", |f| opt_time(f.end_time)),
        ("classType", |f| FieldValue::Text(f.class_type.clone())),
        ("sourceLocation", |f| FieldValue::Text(f.source_location.clone())),
        ("activeRegionNum", |f| opt_region(f.active_region_num)),
        ("note", |f| FieldValue::Text(f.note.clone())),
        ("link", |f| FieldValue::Text(f.link.clone())),
    ],
};

/// Queryable fields of a CME, under their DONKI wire names. `speed`
/// exposes the resolved representative speed, not a raw analysis field.
pub const CME_REGISTRY: FieldRegistry<CmeEvent> = FieldRegistry {
    fields: &[
        ("activityID", |c| FieldValue::Text(c.activity_id.clone())),
        ("catalog", |c| FieldValue::Text(c.catalog.clone())),
        ("startTime", |c| opt_time(c.start_time)),
        ("sourceLocation", |c| FieldValue::Text(c.source_location.clone())),
        ("activeRegionNum", |c| opt_region(c.active_region_num)),
        ("note", |c| FieldValue::Text(c.note.clone())),
        ("link", |c| FieldValue::Text(c.link.clone())),
        ("speed", |c| FieldValue::Number(resolve_cme_speed(c))),
    ],
};
