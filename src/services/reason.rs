//! Structured classification reasons and their text rendering.
//!
//! The scoring core emits reason *data*; turning it into prose happens
//! here, at the presentation edge. Keeping the two apart lets the engine
//! tests assert on variants instead of matching strings.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::services::analysis::InterestingEvent;

/// Why an event was classified as interesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterestReason {
    /// The flare had no CME within the association window.
    NoAssociatedCme,
    /// Resolved CME speed fell below the expected range for the class.
    SlowCme {
        class_type: String,
        speed: f64,
        expected_min: f64,
    },
    /// Resolved CME speed exceeded the expected range for the class.
    FastCme {
        class_type: String,
        speed: f64,
        expected_max: f64,
    },
    /// Speed sat inside the raw range but the pairing still qualified
    /// (magnitude-adjusted bounds or the confidence branch).
    UnexpectedPairing {
        class_type: String,
        speed: f64,
        expected_min: f64,
        expected_max: f64,
    },
    /// The flare class letter has no configured speed range or the
    /// magnitude was unparseable.
    UnknownFlareClass,
    /// Part of a tight temporal cluster of flares.
    QuickSuccession { count: usize, window_minutes: i64 },
}

/// Qualitative band for a surprise factor value.
fn surprise_band(surprise: f64) -> &'static str {
    match surprise {
        s if s < 5.0 => "Low",
        s if s < 10.0 => "Moderate",
        s if s < 20.0 => "High",
        _ => "Extremely High",
    }
}

/// Render an event's reason as the human-readable explanation exposed
/// by the report endpoints.
pub fn format_reason(event: &InterestingEvent, config: &AnalysisConfig) -> String {
    let mut text = match &event.reason {
        InterestReason::NoAssociatedCme => "Flare with no associated CME".to_string(),
        InterestReason::SlowCme { class_type, speed, expected_min } => format!(
            "Unusually slow CME for {class_type} flare class (Speed: {speed:.1} km/s, Expected min: {expected_min} km/s)"
        ),
        InterestReason::FastCme { class_type, speed, expected_max } => format!(
            "Unusually fast CME for {class_type} flare class (Speed: {speed:.1} km/s, Expected max: {expected_max} km/s)"
        ),
        InterestReason::UnexpectedPairing { class_type, speed, expected_min, expected_max } => {
            format!(
                "Unexpected surprise factor for {class_type} flare class (Speed: {speed:.1} km/s, Expected range: {expected_min}-{expected_max} km/s)"
            )
        }
        InterestReason::UnknownFlareClass => "Unknown flare class".to_string(),
        InterestReason::QuickSuccession { count, window_minutes } => {
            // The detector-specific branches below do not apply here.
            return format!("{count} flares in quick succession within {window_minutes} minutes");
        }
    };

    text.push_str(&format!(
        "\nSurprise Factor: {:.2} ({})",
        event.surprise_factor,
        surprise_band(event.surprise_factor)
    ));
    text.push_str(&format!("\nConfidence Level: {:.2}%", event.confidence * 100.0));

    if let Some(cme) = &event.cme {
        text.push_str("\nCME Details:");
        text.push_str(&format!(
            "\n- Start Time: {}",
            cme.start_time.map_or_else(|| "Unknown".to_string(), |t| t.to_rfc3339())
        ));
        text.push_str(&format!("\n- Number of CME Analyses: {}", cme.analyses.len()));
        if let Some(best) = cme.analyses.iter().find(|a| a.is_most_accurate) {
            text.push_str("\n- Most Accurate Analysis:");
            if let Some(speed) = best.speed {
                text.push_str(&format!(" speed {speed:.1} km/s,"));
            }
            if let Some(half_angle) = best.half_angle {
                text.push_str(&format!(" half angle {half_angle:.1} deg,"));
            }
            text.push_str(&format!(" technique {}", best.measurement_technique));
        }
        text.push_str(&format!(
            "\nSpeed used in calculations: {:.1} km/s",
            event.cme_speed
        ));
    }

    if event.confidence < 0.5 {
        text.push_str("\nNote: Low confidence in this event association.");
    } else if event.confidence > 0.8 {
        text.push_str("\nNote: High confidence in this event association.");
    }

    if let Some(description) = event
        .matched_mag_class
        .as_ref()
        .and_then(|mag| config.magnetic_class_descriptions.get(mag))
    {
        text.push_str(&format!("\nAssociated sunspot magnetic class: {description}"));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlareEvent;
    use crate::services::analysis::InterestingEvent;

    fn event_with(reason: InterestReason, surprise: f64, confidence: f64) -> InterestingEvent {
        InterestingEvent {
            flare: FlareEvent::default(),
            cme: None,
            cme_speed: 0.0,
            surprise_factor: surprise,
            confidence,
            matched_mag_class: None,
            reason,
        }
    }

    #[test]
    fn no_cme_reason_names_the_condition() {
        let event = event_with(InterestReason::NoAssociatedCme, 1.0, 0.4);
        let text = format_reason(&event, &AnalysisConfig::default());
        assert!(text.contains("no associated CME"));
        assert!(text.contains("Surprise Factor: 1.00 (Low)"));
        assert!(text.contains("Low confidence"));
    }

    #[test]
    fn quick_succession_renders_count_and_window() {
        let event = event_with(
            InterestReason::QuickSuccession { count: 3, window_minutes: 60 },
            1.0,
            0.4,
        );
        let text = format_reason(&event, &AnalysisConfig::default());
        assert_eq!(text, "3 flares in quick succession within 60 minutes");
    }

    #[test]
    fn bands_scale_with_surprise() {
        assert_eq!(surprise_band(0.2), "Low");
        assert_eq!(surprise_band(7.0), "Moderate");
        assert_eq!(surprise_band(12.0), "High");
        assert_eq!(surprise_band(25.0), "Extremely High");
    }

    #[test]
    fn fast_cme_reason_carries_bounds() {
        let reason = InterestReason::FastCme {
            class_type: "X2.0".to_string(),
            speed: 2500.0,
            expected_max: 2000.0,
        };
        let text = format_reason(&event_with(reason, 0.9, 1.0), &AnalysisConfig::default());
        assert!(text.contains("Unusually fast CME for X2.0"));
        assert!(text.contains("Expected max: 2000"));
        assert!(text.contains("High confidence"));
    }
}
