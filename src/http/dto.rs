//! Request and response DTOs for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::services::report::{RegionActivity, SameTimePair};
use crate::services::{format_reason, resolve_cme_speed, InterestingEvent};

use super::error::AppError;

/// Query parameters shared by the event endpoints.
///
/// `filter` is repeatable, which rules out a plain serde struct
/// extractor; the raw key/value pairs are collected and sorted here
/// instead. Unknown parameter names are rejected rather than ignored.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub filters: Vec<String>,
    pub order_by: Option<String>,
    pub direction: Option<String>,
}

impl EventQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "startDate" => query.start_date = Some(value),
                "endDate" => query.end_date = Some(value),
                "filter" => query.filters.push(value),
                "orderBy" => query.order_by = Some(value),
                "direction" => query.direction = Some(value),
                other => {
                    return Err(AppError::BadRequest(format!(
                        "unknown query parameter {other:?}"
                    )))
                }
            }
        }
        Ok(query)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventListResponse<T> {
    pub events: Vec<T>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupResponse {
    pub field: String,
    pub groups: BTreeMap<String, usize>,
    pub total: usize,
}

/// One flagged event, flattened for API consumers: the flare identity,
/// the chosen CME (if any) and the scores, plus the rendered
/// explanation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestingEventDto {
    pub flare_id: String,
    pub class_type: String,
    pub begin_time: Option<DateTime<Utc>>,
    pub peak_time: Option<DateTime<Utc>>,
    pub active_region_num: Option<i64>,
    pub cme_id: Option<String>,
    pub cme_start_time: Option<DateTime<Utc>>,
    pub cme_speed: f64,
    pub surprise_factor: f64,
    pub confidence: f64,
    pub reason: String,
}

impl InterestingEventDto {
    pub fn from_event(event: &InterestingEvent, config: &AnalysisConfig) -> Self {
        Self {
            flare_id: event.flare.flr_id.clone(),
            class_type: event.flare.class_type.clone(),
            begin_time: event.flare.begin_time,
            peak_time: event.flare.peak_time,
            active_region_num: event.flare.active_region_num,
            cme_id: event.cme.as_ref().map(|c| c.activity_id.clone()),
            cme_start_time: event.cme.as_ref().and_then(|c| c.start_time),
            cme_speed: event.cme_speed,
            surprise_factor: event.surprise_factor,
            confidence: event.confidence,
            reason: format_reason(event, config),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlaggedReportResponse {
    pub events: Vec<InterestingEventDto>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SameTimeResponse {
    pub pairs: Vec<SameTimePair>,
    pub total: usize,
}

/// Per-region row of the structured region report.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionActivityDto {
    pub region: Option<i64>,
    pub total_sunspots: f64,
    pub recent_sunspots: f64,
    pub significant_flare_count: usize,
    pub strongest_flare: Option<String>,
    pub cme_count: usize,
    pub activity_score: f64,
    pub activity_trend: String,
}

impl From<&RegionActivity> for RegionActivityDto {
    fn from(activity: &RegionActivity) -> Self {
        Self {
            region: activity.region,
            total_sunspots: activity.total_sunspots,
            recent_sunspots: activity.recent_sunspots,
            significant_flare_count: activity.significant_flares.len(),
            strongest_flare: activity.strongest_flare().map(|f| f.class_type.clone()),
            cme_count: activity.cme_count,
            activity_score: activity.activity_score(),
            activity_trend: activity.activity_trend().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegionReportResponse {
    pub report: String,
    pub regions: Vec<RegionActivityDto>,
}

/// A CME row augmented with its resolved representative speed.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmeDto {
    #[serde(flatten)]
    pub event: crate::models::CmeEvent,
    pub resolved_speed: f64,
}

impl From<crate::models::CmeEvent> for CmeDto {
    fn from(event: crate::models::CmeEvent) -> Self {
        let resolved_speed = resolve_cme_speed(&event);
        Self { event, resolved_speed }
    }
}
