//! Flare/CME correlation and anomaly scoring engine.
//!
//! Joins flares to candidate CMEs inside a configurable association
//! window, resolves one representative speed per CME, matches the most
//! relevant sunspot observation, and scores each pairing with a
//! confidence level and a surprise factor. Pure synchronous
//! computation over in-memory batches; the caller fetches everything
//! up front.

use std::cmp::Ordering;

use chrono::Duration;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::models::{CmeEvent, FlareClass, FlareEvent, SunspotObservation};
use crate::services::reason::InterestReason;

/// One ranked output row of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestingEvent {
    pub flare: FlareEvent,
    pub cme: Option<CmeEvent>,
    /// Resolved speed used in scoring; 0.0 means "no credible speed",
    /// not a measurement.
    pub cme_speed: f64,
    /// Anomaly score, >= 0 and unbounded above.
    pub surprise_factor: f64,
    /// Evidentiary strength, in (0, 1].
    pub confidence: f64,
    /// Magnetic class of the matched sunspot observation, if any.
    /// Carried so the reason formatter can describe it.
    pub matched_mag_class: Option<String>,
    pub reason: InterestReason,
}

/// Pick the single representative propagation speed for a CME.
///
/// Prefers the analysis flagged most accurate when it carries a speed;
/// otherwise falls back to the most recent fit that has one. Returns
/// 0.0 when no analysis has a speed.
pub fn resolve_cme_speed(cme: &CmeEvent) -> f64 {
    if let Some(flagged) = cme.analyses.iter().find(|a| a.is_most_accurate) {
        if let Some(speed) = flagged.speed {
            return speed;
        }
    }
    cme.analyses
        .iter()
        .filter(|a| a.speed.is_some())
        .max_by_key(|a| a.time21_5)
        .and_then(|a| a.speed)
        .unwrap_or(0.0)
}

/// Find the sunspot observation most relevant to a flare.
///
/// A candidate's region string must be contained in the flare's
/// active-region string. Upstream region numbering truncates leading
/// digits inconsistently between sources, so containment is the
/// deliberate tolerance mechanism here, not an oversight. Among
/// candidates with a known observation time the one closest to the
/// flare's begin time wins.
pub fn find_relevant_sunspot<'a>(
    flare: &FlareEvent,
    catalog: &'a [SunspotObservation],
) -> Option<&'a SunspotObservation> {
    let flare_region = flare.active_region_str()?;
    let begin = flare.begin_time?;

    catalog
        .iter()
        .filter(|spot| {
            spot.region_str()
                .is_some_and(|r| !r.is_empty() && flare_region.contains(&r))
        })
        .filter_map(|spot| {
            let time_tag = spot.time_tag?;
            Some((spot, (time_tag - begin).abs()))
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(spot, _)| spot)
}

/// Evidentiary-strength score for a flare/CME pairing.
///
/// Expressed as a fold over (condition, multiplier) pairs so each
/// contributing discount is independently testable. Starts at 1.0 and
/// only degrades; it never reaches zero.
pub fn confidence_level(flare: &FlareEvent, cme: Option<&CmeEvent>) -> f64 {
    // The speed check looks at the *latest* analysis, independent of the
    // resolver's most-accurate preference: a stale flagged fit should
    // not mask a speedless newest one.
    let latest_lacks_speed = match cme {
        Some(cme) => cme
            .analyses
            .iter()
            .max_by_key(|a| a.time21_5)
            .map_or(true, |a| a.speed.unwrap_or(0.0) == 0.0),
        None => true,
    };

    let discounts = [
        (cme.is_none(), 0.5),
        (flare.begin_time.is_none() || flare.class_type.is_empty(), 0.7),
        (latest_lacks_speed, 0.8),
    ];

    discounts
        .iter()
        .filter(|(applies, _)| *applies)
        .fold(1.0, |confidence, (_, multiplier)| confidence * multiplier)
}

/// Morphology multiplier derived from a matched sunspot observation.
fn sunspot_factor(spot: &SunspotObservation) -> f64 {
    let class_factor = match spot.spot_class.chars().next() {
        Some('A') => 0.5,
        Some('B') => 1.0,
        Some('C') => 1.5,
        _ => 2.0,
    };
    let mag_factor = match spot.mag_class.as_str() {
        "A" => 0.5,
        "B" => 1.0,
        _ => 1.5,
    };
    (1.0 + spot.area / 100.0 + spot.num_spot / 10.0) * class_factor * mag_factor
}

/// The correlation/scoring engine, parameterized by the tunable
/// thresholds in [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct FlareAnalyzer {
    config: AnalysisConfig,
}

impl FlareAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// All CMEs whose start time falls within
    /// `[flare.begin, flare.peak + window]`. The window is added only on
    /// the trailing edge: CMEs erupt during or after the flare's rise
    /// phase, never before its onset.
    pub fn associated_cmes<'a>(
        &self,
        flare: &FlareEvent,
        cmes: &'a [CmeEvent],
    ) -> Vec<&'a CmeEvent> {
        let (Some(begin), Some(peak)) = (flare.begin_time, flare.peak_time) else {
            return Vec::new();
        };
        let window = Duration::seconds(
            (self.config.cme_association_window_hours * 3600.0).round() as i64,
        );
        cmes.iter()
            .filter(|cme| {
                cme.start_time
                    .is_some_and(|start| start >= begin && start <= peak + window)
            })
            .collect()
    }

    /// How far the resolved CME speed deviates from the range expected
    /// for the flare's class, scaled by sunspot morphology. Unmatched
    /// class letters and unparseable magnitudes score 0.
    pub fn surprise_factor(
        &self,
        flare: &FlareEvent,
        cme_speed: f64,
        sunspot: Option<&SunspotObservation>,
    ) -> f64 {
        let Some(class) = FlareClass::parse(&flare.class_type) else {
            return 0.0;
        };
        let Some(range) = self.config.speed_range_for(class.letter) else {
            return 0.0;
        };

        // Stronger flares within a class shift the expected band upward.
        let scale = 1.0 + (class.magnitude - 1.0) * 0.1;
        let adjusted_min = range.min * scale;
        let adjusted_max = range.max * scale;

        let raw = if cme_speed < adjusted_min {
            (adjusted_min - cme_speed) / adjusted_min
        } else if cme_speed > adjusted_max {
            (cme_speed - adjusted_max) / adjusted_max
        } else {
            0.0
        };

        raw * sunspot.map_or(1.0, sunspot_factor)
    }

    /// Build the structured reason for a scored flare/CME pairing. The
    /// slow/fast split reports the raw configured bounds, not the
    /// magnitude-adjusted ones used for scoring.
    fn determine_reason(&self, flare: &FlareEvent, cme_speed: f64) -> InterestReason {
        let Some(range) = FlareClass::parse(&flare.class_type)
            .and_then(|class| self.config.speed_range_for(class.letter))
        else {
            return InterestReason::UnknownFlareClass;
        };
        if cme_speed < range.min {
            InterestReason::SlowCme {
                class_type: flare.class_type.clone(),
                speed: cme_speed,
                expected_min: range.min,
            }
        } else if cme_speed > range.max {
            InterestReason::FastCme {
                class_type: flare.class_type.clone(),
                speed: cme_speed,
                expected_max: range.max,
            }
        } else {
            InterestReason::UnexpectedPairing {
                class_type: flare.class_type.clone(),
                speed: cme_speed,
                expected_min: range.min,
                expected_max: range.max,
            }
        }
    }

    /// Flag the current flare when it sits in a tight temporal cluster.
    ///
    /// Peers are excluded by identity, not field equality, so two
    /// distinct flares with identical records still count each other.
    /// Each cluster member is flagged independently; the resulting
    /// duplicate-looking entries are accepted by design.
    fn check_quick_succession(
        &self,
        all_flares: &[&FlareEvent],
        current: &FlareEvent,
    ) -> Option<InterestingEvent> {
        let begin = current.begin_time?;
        let window = Duration::minutes(self.config.quick_succession_window_minutes);

        let count = 1 + all_flares
            .iter()
            .filter(|&&f| !std::ptr::eq(f, current))
            .filter(|f| f.begin_time.is_some_and(|t| (t - begin).abs() <= window))
            .count();

        if count < self.config.quick_succession_threshold {
            return None;
        }
        Some(InterestingEvent {
            flare: current.clone(),
            cme: None,
            cme_speed: 0.0,
            surprise_factor: 1.0,
            confidence: confidence_level(current, None),
            matched_mag_class: None,
            reason: InterestReason::QuickSuccession {
                count,
                window_minutes: self.config.quick_succession_window_minutes,
            },
        })
    }

    /// Analyze a batch of flares and CMEs against the sunspot catalog
    /// and return every interesting event, sorted descending by
    /// surprise factor.
    ///
    /// Flares missing a begin time or class are silently skipped; a
    /// malformed individual record never aborts the batch. The sort is
    /// stable, so identical inputs produce identical output order.
    pub fn analyze_events(
        &self,
        flares: &[FlareEvent],
        cmes: &[CmeEvent],
        sunspots: &[SunspotObservation],
    ) -> Vec<InterestingEvent> {
        let valid_flares: Vec<&FlareEvent> = flares
            .iter()
            .filter(|f| f.begin_time.is_some() && !f.class_type.is_empty())
            .collect();
        debug!(
            flares = flares.len(),
            valid = valid_flares.len(),
            cmes = cmes.len(),
            sunspots = sunspots.len(),
            "analyzing event batch"
        );

        let mut events = Vec::new();
        for &flare in &valid_flares {
            let candidates = self.associated_cmes(flare, cmes);

            if candidates.is_empty() {
                events.push(InterestingEvent {
                    flare: flare.clone(),
                    cme: None,
                    cme_speed: 0.0,
                    surprise_factor: 1.0,
                    confidence: confidence_level(flare, None),
                    matched_mag_class: None,
                    reason: InterestReason::NoAssociatedCme,
                });
            } else {
                let sunspot = find_relevant_sunspot(flare, sunspots);
                for cme in candidates {
                    let cme_speed = resolve_cme_speed(cme);
                    let surprise_factor = self.surprise_factor(flare, cme_speed, sunspot);
                    let confidence = confidence_level(flare, Some(cme));

                    if surprise_factor > 0.5 || confidence < 0.7 {
                        events.push(InterestingEvent {
                            flare: flare.clone(),
                            cme: Some(cme.clone()),
                            cme_speed,
                            surprise_factor,
                            confidence,
                            matched_mag_class: sunspot.map(|s| s.mag_class.clone()),
                            reason: self.determine_reason(flare, cme_speed),
                        });
                    }
                }
            }

            if let Some(event) = self.check_quick_succession(&valid_flares, flare) {
                events.push(event);
            }
        }

        events.sort_by(|a, b| {
            b.surprise_factor
                .partial_cmp(&a.surprise_factor)
                .unwrap_or(Ordering::Equal)
        });
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CmeAnalysis;
    use chrono::{DateTime, TimeZone, Utc};

    fn t(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 1 + minute / 60, minute % 60, 0).unwrap()
    }

    fn flare(id: &str, class: &str, begin_minute: u32) -> FlareEvent {
        FlareEvent {
            flr_id: id.to_string(),
            begin_time: Some(t(begin_minute)),
            peak_time: Some(t(begin_minute + 20)),
            class_type: class.to_string(),
            active_region_num: Some(13664),
            ..FlareEvent::default()
        }
    }

    fn cme_with_speed(id: &str, start_minute: u32, speed: f64) -> CmeEvent {
        CmeEvent {
            activity_id: id.to_string(),
            start_time: Some(t(start_minute)),
            analyses: vec![CmeAnalysis {
                is_most_accurate: true,
                time21_5: Some(t(start_minute + 60)),
                speed: Some(speed),
                ..CmeAnalysis::default()
            }],
            ..CmeEvent::default()
        }
    }

    fn analyzer() -> FlareAnalyzer {
        FlareAnalyzer::new(AnalysisConfig::default())
    }

    mod speed_resolver {
        use super::*;

        #[test]
        fn prefers_most_accurate_analysis() {
            let mut cme = cme_with_speed("cme", 10, 900.0);
            cme.analyses.push(CmeAnalysis {
                is_most_accurate: false,
                time21_5: Some(t(300)),
                speed: Some(1500.0),
                ..CmeAnalysis::default()
            });
            assert_eq!(resolve_cme_speed(&cme), 900.0);
        }

        #[test]
        fn falls_back_past_speedless_flagged_analysis() {
            let cme = CmeEvent {
                analyses: vec![
                    CmeAnalysis {
                        is_most_accurate: false,
                        time21_5: Some(t(0)),
                        speed: Some(400.0),
                        ..CmeAnalysis::default()
                    },
                    CmeAnalysis {
                        is_most_accurate: true,
                        time21_5: Some(t(60)),
                        speed: None,
                        ..CmeAnalysis::default()
                    },
                ],
                ..CmeEvent::default()
            };
            assert_eq!(resolve_cme_speed(&cme), 400.0);
        }

        #[test]
        fn fallback_takes_most_recent_fit_with_speed() {
            let cme = CmeEvent {
                analyses: vec![
                    CmeAnalysis {
                        time21_5: Some(t(0)),
                        speed: Some(400.0),
                        ..CmeAnalysis::default()
                    },
                    CmeAnalysis {
                        time21_5: Some(t(120)),
                        speed: Some(700.0),
                        ..CmeAnalysis::default()
                    },
                    CmeAnalysis {
                        time21_5: Some(t(240)),
                        speed: None,
                        ..CmeAnalysis::default()
                    },
                ],
                ..CmeEvent::default()
            };
            assert_eq!(resolve_cme_speed(&cme), 700.0);
        }

        #[test]
        fn zero_when_no_analysis_has_speed() {
            let cme = CmeEvent {
                analyses: vec![CmeAnalysis::default()],
                ..CmeEvent::default()
            };
            assert_eq!(resolve_cme_speed(&cme), 0.0);
            assert_eq!(resolve_cme_speed(&CmeEvent::default()), 0.0);
        }
    }

    mod sunspot_matcher {
        use super::*;

        fn spot(region: i64, minute: u32) -> SunspotObservation {
            SunspotObservation {
                region: Some(region),
                time_tag: Some(t(minute)),
                ..SunspotObservation::default()
            }
        }

        #[test]
        fn none_without_active_region_regardless_of_catalog() {
            let mut f = flare("f", "M1.0", 0);
            f.active_region_num = None;
            assert!(find_relevant_sunspot(&f, &[spot(13664, 0)]).is_none());
        }

        #[test]
        fn none_without_begin_time() {
            let mut f = flare("f", "M1.0", 0);
            f.begin_time = None;
            assert!(find_relevant_sunspot(&f, &[spot(13664, 0)]).is_none());
        }

        #[test]
        fn matches_truncated_region_by_containment() {
            // NOAA drops the leading digits of the DONKI region number.
            let f = flare("f", "M1.0", 0);
            let catalog = [spot(3664, 30), spot(9999, 5)];
            let matched = find_relevant_sunspot(&f, &catalog).unwrap();
            assert_eq!(matched.region, Some(3664));
        }

        #[test]
        fn picks_observation_closest_to_begin_time() {
            let f = flare("f", "M1.0", 60);
            let catalog = [spot(3664, 0), spot(3664, 50), spot(13664, 600)];
            let matched = find_relevant_sunspot(&f, &catalog).unwrap();
            assert_eq!(matched.time_tag, Some(t(50)));
        }

        #[test]
        fn candidates_without_time_tag_are_ignored() {
            let f = flare("f", "M1.0", 0);
            let mut untimed = spot(3664, 0);
            untimed.time_tag = None;
            assert!(find_relevant_sunspot(&f, &[untimed]).is_none());
        }
    }

    mod temporal_correlator {
        use super::*;

        #[test]
        fn never_matches_cme_starting_before_flare_begin() {
            let f = flare("f", "M1.0", 60);
            let cmes = [cme_with_speed("early", 30, 800.0), cme_with_speed("in", 70, 800.0)];
            let matched = analyzer().associated_cmes(&f, &cmes);
            assert_eq!(matched.len(), 1);
            assert_eq!(matched[0].activity_id, "in");
        }

        #[test]
        fn window_extends_past_peak_only() {
            let f = flare("f", "M1.0", 0); // begin 0, peak 20
            let analyzer = analyzer(); // 6 h window
            let cmes = [
                cme_with_speed("inside", 20 + 359, 800.0),
                cme_with_speed("outside", 20 + 361, 800.0),
            ];
            let matched = analyzer.associated_cmes(&f, &cmes);
            assert_eq!(matched.len(), 1);
            assert_eq!(matched[0].activity_id, "inside");
        }

        #[test]
        fn missing_begin_or_peak_yields_no_candidates() {
            let mut f = flare("f", "M1.0", 0);
            f.peak_time = None;
            assert!(analyzer().associated_cmes(&f, &[cme_with_speed("c", 10, 800.0)]).is_empty());
        }
    }

    mod anomaly_scorer {
        use super::*;

        #[test]
        fn confidence_discounts_compound() {
            let f = flare("f", "M1.0", 0);
            // All evidence present: no discount applies.
            let strong = cme_with_speed("c", 10, 800.0);
            assert_eq!(confidence_level(&f, Some(&strong)), 1.0);

            // No CME: x0.5 and (no analysis to yield a speed) x0.8.
            assert!((confidence_level(&f, None) - 0.4).abs() < 1e-12);

            // CME without analyses: x0.8.
            let bare = CmeEvent::default();
            assert!((confidence_level(&f, Some(&bare)) - 0.8).abs() < 1e-12);

            // Classless flare on top of a bare CME: x0.7 x0.8.
            let mut unclassed = f.clone();
            unclassed.class_type.clear();
            assert!((confidence_level(&unclassed, Some(&bare)) - 0.56).abs() < 1e-12);
        }

        #[test]
        fn confidence_checks_latest_analysis_not_resolver_choice() {
            // Flagged fit has a speed, but a newer fit does not: the
            // evidence is considered weak even though a speed resolves.
            let mut cme = cme_with_speed("c", 10, 900.0);
            cme.analyses.push(CmeAnalysis {
                time21_5: Some(t(600)),
                speed: None,
                ..CmeAnalysis::default()
            });
            let f = flare("f", "M1.0", 0);
            assert!((confidence_level(&f, Some(&cme)) - 0.8).abs() < 1e-12);
        }

        #[test]
        fn x_class_overspeed_matches_worked_example() {
            // X2.0: adjustedMax = 2000 * 1.1 = 2200; speed 2500
            // => (2500 - 2200) / 2200.
            let f = flare("f", "X2.0", 0);
            let surprise = analyzer().surprise_factor(&f, 2500.0, None);
            assert!((surprise - 300.0 / 2200.0).abs() < 1e-9);
        }

        #[test]
        fn underspeed_scales_against_adjusted_min() {
            // M2.0: adjustedMin = 500 * 1.1 = 550; speed 110 => 0.8.
            let f = flare("f", "M2.0", 0);
            let surprise = analyzer().surprise_factor(&f, 110.0, None);
            assert!((surprise - 0.8).abs() < 1e-9);
        }

        #[test]
        fn in_range_speed_scores_zero() {
            let f = flare("f", "M1.0", 0);
            assert_eq!(analyzer().surprise_factor(&f, 800.0, None), 0.0);
        }

        #[test]
        fn unknown_class_or_magnitude_scores_zero() {
            let f = flare("f", "Q9.0", 0);
            assert_eq!(analyzer().surprise_factor(&f, 5000.0, None), 0.0);
            let f = flare("f", "Mx", 0);
            assert_eq!(analyzer().surprise_factor(&f, 5000.0, None), 0.0);
        }

        #[test]
        fn sunspot_factor_scales_raw_surprise() {
            let f = flare("f", "X2.0", 0);
            let spot = SunspotObservation {
                region: Some(3664),
                time_tag: Some(t(0)),
                area: 100.0,
                num_spot: 10.0,
                spot_class: "Fkc".to_string(), // other => 2.0
                mag_class: "BGD".to_string(),  // other => 1.5
                ..SunspotObservation::default()
            };
            // (1 + 1 + 1) * 2.0 * 1.5 = 9.0
            let raw = analyzer().surprise_factor(&f, 2500.0, None);
            let scaled = analyzer().surprise_factor(&f, 2500.0, Some(&spot));
            assert!((scaled - raw * 9.0).abs() < 1e-9);
        }

        #[test]
        fn quiet_spot_classes_damp_the_score() {
            let f = flare("f", "X2.0", 0);
            let spot = SunspotObservation {
                spot_class: "Axx".to_string(), // A => 0.5
                mag_class: "A".to_string(),    // A => 0.5
                ..SunspotObservation::default()
            };
            // (1 + 0 + 0) * 0.5 * 0.5 = 0.25
            let raw = analyzer().surprise_factor(&f, 2500.0, None);
            let scaled = analyzer().surprise_factor(&f, 2500.0, Some(&spot));
            assert!((scaled - raw * 0.25).abs() < 1e-9);
        }
    }

    mod succession_detector {
        use super::*;

        #[test]
        fn cluster_members_are_flagged_and_outlier_is_not() {
            // Begin times at minutes 0, 10, 20 and 90: the first three
            // each count 3 inclusive, the last counts only itself.
            let flares = vec![
                flare("f0", "C5.0", 0),
                flare("f1", "C5.0", 10),
                flare("f2", "C5.0", 20),
                flare("f3", "C5.0", 90),
            ];
            let refs: Vec<&FlareEvent> = flares.iter().collect();
            let analyzer = analyzer();

            for clustered in &flares[..3] {
                let event = analyzer.check_quick_succession(&refs, clustered).unwrap();
                assert_eq!(
                    event.reason,
                    InterestReason::QuickSuccession { count: 3, window_minutes: 60 }
                );
                assert_eq!(event.surprise_factor, 1.0);
            }
            assert!(analyzer.check_quick_succession(&refs, &flares[3]).is_none());
        }

        #[test]
        fn identical_records_count_as_distinct_peers() {
            let flares = vec![flare("f", "C5.0", 0), flare("f", "C5.0", 0), flare("f", "C5.0", 0)];
            let refs: Vec<&FlareEvent> = flares.iter().collect();
            let event = analyzer().check_quick_succession(&refs, &flares[0]).unwrap();
            assert_eq!(
                event.reason,
                InterestReason::QuickSuccession { count: 3, window_minutes: 60 }
            );
        }
    }

    mod orchestrator {
        use super::*;

        #[test]
        fn no_candidate_flare_emits_exactly_one_no_cme_event() {
            let flares = vec![flare("lonely", "M1.0", 0)];
            let events = analyzer().analyze_events(&flares, &[], &[]);
            assert_eq!(events.len(), 1);
            let event = &events[0];
            assert_eq!(event.reason, InterestReason::NoAssociatedCme);
            assert_eq!(event.cme_speed, 0.0);
            assert_eq!(event.surprise_factor, 1.0);
            assert!(event.cme.is_none());
        }

        #[test]
        fn invalid_flares_are_silently_skipped() {
            let mut no_begin = flare("nb", "M1.0", 0);
            no_begin.begin_time = None;
            let mut no_class = flare("nc", "", 0);
            no_class.class_type.clear();
            let events = analyzer().analyze_events(&[no_begin, no_class], &[], &[]);
            assert!(events.is_empty());
        }

        #[test]
        fn exotic_class_letters_do_not_abort_the_batch() {
            // Non-ASCII class text parses but matches no configured
            // range: surprise 0, full confidence, nothing emitted.
            let flares = vec![flare("odd", "Ω1.0", 0)];
            let cmes = vec![cme_with_speed("c", 10, 800.0)];
            let events = analyzer().analyze_events(&flares, &cmes, &[]);
            assert!(events.is_empty());
        }

        #[test]
        fn unsurprising_confident_pairings_are_not_emitted() {
            let flares = vec![flare("f", "M1.0", 0)];
            let cmes = vec![cme_with_speed("c", 10, 800.0)];
            let events = analyzer().analyze_events(&flares, &cmes, &[]);
            assert!(events.is_empty());
        }

        #[test]
        fn fast_cme_is_emitted_with_reason_and_bounds() {
            let flares = vec![flare("f", "X2.0", 0)];
            let cmes = vec![cme_with_speed("c", 10, 4000.0)];
            let events = analyzer().analyze_events(&flares, &cmes, &[]);
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].cme_speed, 4000.0);
            assert_eq!(
                events[0].reason,
                InterestReason::FastCme {
                    class_type: "X2.0".to_string(),
                    speed: 4000.0,
                    expected_max: 2000.0,
                }
            );
        }

        #[test]
        fn borderline_confidence_alone_does_not_qualify() {
            // Latest analysis lacks a speed (x0.8) but the resolved
            // speed is in range: 0.8 >= 0.7 and surprise 0, so the
            // pairing is not emitted.
            let flares = vec![flare("f", "M1.0", 0)];
            let mut cme = cme_with_speed("c", 10, 800.0);
            cme.analyses.push(CmeAnalysis {
                time21_5: Some(t(700)),
                speed: None,
                ..CmeAnalysis::default()
            });
            let events = analyzer().analyze_events(&flares, &[cme], &[]);
            // confidence 0.8, surprise 0: does not qualify.
            assert!(events.is_empty());
        }

        #[test]
        fn succession_runs_even_for_flares_without_cmes() {
            let flares = vec![
                flare("f0", "C5.0", 0),
                flare("f1", "C5.0", 10),
                flare("f2", "C5.0", 20),
            ];
            let events = analyzer().analyze_events(&flares, &[], &[]);
            // Per flare: one no-CME event and one succession event.
            assert_eq!(events.len(), 6);
            let succession = events
                .iter()
                .filter(|e| matches!(e.reason, InterestReason::QuickSuccession { .. }))
                .count();
            assert_eq!(succession, 3);
        }

        #[test]
        fn scores_stay_in_contract_bounds() {
            let flares = vec![
                flare("f0", "C5.0", 0),
                flare("f1", "M1.0", 10),
                flare("f2", "X2.0", 20),
            ];
            let cmes = vec![
                cme_with_speed("slow", 5, 50.0),
                cme_with_speed("fast", 15, 4000.0),
            ];
            let events = analyzer().analyze_events(&flares, &cmes, &[]);
            assert!(!events.is_empty());
            for event in &events {
                assert!(event.confidence > 0.0 && event.confidence <= 1.0);
                assert!(event.surprise_factor >= 0.0);
            }
        }

        #[test]
        fn output_is_sorted_descending_and_idempotent() {
            let flares = vec![
                flare("f0", "C5.0", 0),
                flare("f1", "M1.0", 10),
                flare("f2", "X2.0", 20),
                flare("f3", "M5.0", 400),
            ];
            let cmes = vec![
                cme_with_speed("c0", 5, 50.0),
                cme_with_speed("c1", 15, 4000.0),
                cme_with_speed("c2", 405, 3000.0),
            ];
            let analyzer = analyzer();
            let first = analyzer.analyze_events(&flares, &cmes, &[]);
            let second = analyzer.analyze_events(&flares, &cmes, &[]);
            assert_eq!(first, second);
            for pair in first.windows(2) {
                assert!(pair[0].surprise_factor >= pair[1].surprise_factor);
            }
        }
    }
}
