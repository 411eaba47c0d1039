//! Region activity and same-time correlation reports.
//!
//! These aggregate the raw feeds into the two summary views exposed by
//! the report endpoints: a per-active-region activity rollup over the
//! trailing 30 days, and a list of flare/CME pairs that started at
//! nearly the same time.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CmeEvent, FlareClass, FlareEvent, FluxReading, SolarRegion, SunspotObservation};

/// Aggregated activity for one active region. `region: None` is the
/// pseudo-row collecting CMEs that carry no region number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionActivity {
    pub region: Option<i64>,
    pub total_sunspots: f64,
    pub recent_sunspots: f64,
    pub significant_flares: Vec<FlareEvent>,
    pub recent_significant_flares: Vec<FlareEvent>,
    pub cme_count: usize,
    pub recent_cme_count: usize,
}

impl RegionActivity {
    /// Weighted score used both for ordering and the trend label.
    pub fn activity_score(&self) -> f64 {
        self.total_sunspots
            + self.significant_flares.len() as f64 * 10.0
            + self.cme_count as f64 * 5.0
    }

    pub fn activity_trend(&self) -> &'static str {
        match self.activity_score() {
            s if s > 1000.0 => "Very Active",
            s if s > 500.0 => "Active",
            s if s > 100.0 => "Moderately Active",
            s if s > 0.0 => "Slightly Active",
            _ => "Inactive",
        }
    }

    /// Strongest M/X flare by peak X-ray flux.
    pub fn strongest_flare(&self) -> Option<&FlareEvent> {
        self.significant_flares
            .iter()
            .filter_map(|f| FlareClass::parse(&f.class_type).map(|c| (f, c.peak_flux())))
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(f, _)| f)
    }
}

fn sunspot_total(sunspots: &[SunspotObservation], region: i64, since: DateTime<Utc>) -> f64 {
    sunspots
        .iter()
        .filter(|s| s.region == Some(region))
        .filter(|s| {
            NaiveDate::parse_from_str(&s.obsdate, "%Y-%m-%d")
                .is_ok_and(|d| d.and_hms_opt(0, 0, 0).is_some_and(|t| t.and_utc() >= since))
        })
        .map(|s| s.num_spot)
        .sum()
}

fn significant_flares(flares: &[FlareEvent], region: i64, since: DateTime<Utc>) -> Vec<FlareEvent> {
    let region_str = region.to_string();
    flares
        .iter()
        .filter(|f| {
            f.active_region_str()
                .is_some_and(|r| r.ends_with(&region_str))
        })
        .filter(|f| f.begin_time.is_some_and(|t| t >= since))
        .filter(|f| {
            let class = f.class_type.to_ascii_uppercase();
            class.starts_with('M') || class.starts_with('X')
        })
        .cloned()
        .collect()
}

fn cme_count(cmes: &[CmeEvent], region: i64, since: DateTime<Utc>) -> usize {
    let region_str = region.to_string();
    cmes.iter()
        .filter(|c| {
            c.active_region_num
                .is_some_and(|n| n.to_string().ends_with(&region_str))
        })
        .filter(|c| c.start_time.is_some_and(|t| t >= since))
        .count()
}

/// Build the per-region rollup from the four feeds, ordered by activity
/// score descending.
pub fn build_region_report(
    regions: &[SolarRegion],
    sunspots: &[SunspotObservation],
    flares: &[FlareEvent],
    cmes: &[CmeEvent],
    now: DateTime<Utc>,
) -> Vec<RegionActivity> {
    let thirty_days_ago = now - Duration::days(30);
    let seven_days_ago = now - Duration::days(7);

    let mut seen = std::collections::BTreeSet::new();
    let mut report: Vec<RegionActivity> = regions
        .iter()
        .filter(|r| r.observed_date.is_some_and(|d| d >= thirty_days_ago))
        .filter_map(|r| r.region)
        .filter(|region| seen.insert(*region))
        .map(|region| RegionActivity {
            region: Some(region),
            total_sunspots: sunspot_total(sunspots, region, thirty_days_ago),
            recent_sunspots: sunspot_total(sunspots, region, seven_days_ago),
            significant_flares: significant_flares(flares, region, thirty_days_ago),
            recent_significant_flares: significant_flares(flares, region, seven_days_ago),
            cme_count: cme_count(cmes, region, thirty_days_ago),
            recent_cme_count: cme_count(cmes, region, seven_days_ago),
        })
        .collect();

    report.sort_by(|a, b| {
        b.activity_score()
            .partial_cmp(&a.activity_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // CMEs without a region number get their own trailing row.
    let orphan = |since: DateTime<Utc>| {
        cmes.iter()
            .filter(|c| c.active_region_num.is_none())
            .filter(|c| c.start_time.is_some_and(|t| t >= since))
            .count()
    };
    let orphan_count = orphan(thirty_days_ago);
    if orphan_count > 0 {
        report.push(RegionActivity {
            region: None,
            total_sunspots: 0.0,
            recent_sunspots: 0.0,
            significant_flares: Vec::new(),
            recent_significant_flares: Vec::new(),
            cme_count: orphan_count,
            recent_cme_count: orphan(seven_days_ago),
        });
    }

    report
}

/// Render the rollup as the markdown table served by the report
/// endpoint.
pub fn render_region_report(report: &[RegionActivity], flux: Option<&FluxReading>) -> String {
    let mut text = String::new();
    match flux {
        Some(f) if !f.flux.is_empty() => text.push_str(&format!("Solar Flux: {} sfu\n", f.flux)),
        _ => text.push_str("Solar Flux: N/A\n"),
    }
    text.push('\n');
    text.push_str("** 30 days worth of data, ordered by activity **\n");
    text.push_str("| Region | Total SSN | M/X Flares | Strongest Flare | CME | Note |\n");
    text.push_str("|--------|-----------|------------|-----------------|-----|------|\n");

    for entry in report {
        let region = entry
            .region
            .map_or_else(|| "NORE".to_string(), |r| r.to_string());
        let strongest = entry
            .strongest_flare()
            .map_or("N/A", |f| f.class_type.as_str());
        text.push_str(&format!(
            "| {:>6} | {:>9.0} | {:>10} | {:>15} | {:>3} | {:<20} |\n",
            region,
            entry.total_sunspots,
            entry.significant_flares.len(),
            strongest,
            entry.cme_count,
            entry.activity_trend(),
        ));
    }

    text
}

/// Summary of one CME analysis carried in a same-time pair report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub is_most_accurate: bool,
    #[serde(rename = "type")]
    pub analysis_type: String,
    pub speed: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub half_angle: Option<f64>,
    pub link: String,
}

/// A flare and a CME that started at nearly the same time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SameTimePair {
    pub flare_id: String,
    pub flare_class_type: String,
    pub flare_begin_time: DateTime<Utc>,
    pub flare_peak_time: DateTime<Utc>,
    pub flare_rise_duration_mins: i64,
    pub flare_link: String,
    pub cme_id: String,
    pub cme_start_time: DateTime<Utc>,
    pub time_difference_mins: i64,
    pub cme_analyses: Vec<AnalysisSummary>,
}

/// Tolerance either side of the flare rise phase.
const SAME_TIME_VARIATION_MINS: i64 = 5;
/// Flares with a longer rise than this are not considered impulsive
/// enough for the same-time report.
const MAX_FLARE_RISE_HOURS: i64 = 2;

/// Pair flares with CMEs starting within the flare's rise phase, give
/// or take a small tolerance.
pub fn find_same_time_pairs(flares: &[FlareEvent], cmes: &[CmeEvent]) -> Vec<SameTimePair> {
    let variation = Duration::minutes(SAME_TIME_VARIATION_MINS);
    let max_rise = Duration::hours(MAX_FLARE_RISE_HOURS);

    let mut pairs = Vec::new();
    for flare in flares {
        let (Some(begin), Some(peak)) = (flare.begin_time, flare.peak_time) else {
            continue;
        };
        if peak - begin > max_rise {
            continue;
        }
        let window_start = begin - variation;
        let window_end = peak + variation;

        for cme in cmes {
            let Some(start) = cme.start_time else { continue };
            if start < window_start || start > window_end {
                continue;
            }
            pairs.push(SameTimePair {
                flare_id: flare.flr_id.clone(),
                flare_class_type: flare.class_type.clone(),
                flare_begin_time: begin,
                flare_peak_time: peak,
                flare_rise_duration_mins: (peak - begin).num_minutes(),
                flare_link: flare.link.clone(),
                cme_id: cme.activity_id.clone(),
                cme_start_time: start,
                time_difference_mins: (start - begin).num_minutes(),
                cme_analyses: cme
                    .analyses
                    .iter()
                    .map(|a| AnalysisSummary {
                        is_most_accurate: a.is_most_accurate,
                        analysis_type: a.analysis_type.clone(),
                        speed: a.speed,
                        latitude: a.latitude,
                        longitude: a.longitude,
                        half_angle: a.half_angle,
                        link: a.link.clone(),
                    })
                    .collect(),
            });
        }
    }
    pairs
}
