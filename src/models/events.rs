//! Upstream event entities.
//!
//! Field names follow the wire formats of the two providers: DONKI uses
//! camelCase (with a few irregular keys like `flrID` and `time21_5`),
//! the NOAA sunspot report uses lowercase run-together keys. Every field
//! is defaulted so a partially populated record deserializes instead of
//! failing the whole batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A solar flare event from the DONKI `FLR` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlareEvent {
    #[serde(rename = "flrID")]
    pub flr_id: String,
    /// Absent means "unknown", not zero.
    pub begin_time: Option<DateTime<Utc>>,
    pub peak_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Class letter plus decimal magnitude, e.g. "M1.2". Empty = unknown.
    pub class_type: String,
    pub source_location: String,
    pub active_region_num: Option<i64>,
    pub note: String,
    pub link: String,
}

impl FlareEvent {
    /// Active region number rendered as the join-key string used by the
    /// sunspot matcher and region reports.
    pub fn active_region_str(&self) -> Option<String> {
        self.active_region_num.map(|n| n.to_string())
    }
}

/// A coronal mass ejection from the DONKI `CME` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CmeEvent {
    #[serde(rename = "activityID")]
    pub activity_id: String,
    pub catalog: String,
    pub start_time: Option<DateTime<Utc>>,
    pub source_location: String,
    pub active_region_num: Option<i64>,
    pub note: String,
    pub link: String,
    #[serde(rename = "cmeAnalyses")]
    pub analyses: Vec<CmeAnalysis>,
}

/// One model fit of a CME. A CME carries zero or more of these; at most
/// one should be flagged `is_most_accurate`, but upstream does not
/// enforce that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CmeAnalysis {
    pub is_most_accurate: bool,
    /// Timestamp of the fit at 21.5 solar radii.
    #[serde(rename = "time21_5")]
    pub time21_5: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub half_angle: Option<f64>,
    /// Propagation speed in km/s.
    pub speed: Option<f64>,
    #[serde(rename = "type")]
    pub analysis_type: String,
    pub feature_code: String,
    pub measurement_technique: String,
    pub tilt: Option<f64>,
    pub note: String,
    pub link: String,
}

/// A sunspot observation from the NOAA sunspot report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunspotObservation {
    pub time_tag: Option<DateTime<Utc>>,
    pub obsdate: String,
    /// Unassigned spots carry no region number.
    pub region: Option<i64>,
    /// Area in millionths of the solar hemisphere.
    pub area: f64,
    #[serde(rename = "numspot")]
    pub num_spot: f64,
    #[serde(rename = "spotclass")]
    pub spot_class: String,
    #[serde(rename = "magclass")]
    pub mag_class: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl SunspotObservation {
    pub fn region_str(&self) -> Option<String> {
        self.region.map(|n| n.to_string())
    }
}

/// A solar region record from the NOAA solar regions feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarRegion {
    pub region: Option<i64>,
    pub observed_date: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area: Option<f64>,
    pub spot_class: String,
    pub number_spots: Option<f64>,
}

/// The current 10cm radio flux summary from NOAA.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct FluxReading {
    pub flux: String,
    pub time_stamp: String,
}
