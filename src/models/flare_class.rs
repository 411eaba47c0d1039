//! Flare class designation parsing.

use serde::{Deserialize, Serialize};

/// A parsed flare class designation: a class letter (A/B/C/M/X, in
/// ascending intensity) and a decimal magnitude, e.g. "M1.2".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlareClass {
    pub letter: char,
    pub magnitude: f64,
}

impl FlareClass {
    /// Parse a designation like "X2.0". Returns `None` for anything
    /// shorter than two characters or with an unparseable magnitude; an
    /// unmatched letter still parses (score lookups reject it later).
    pub fn parse(class_type: &str) -> Option<Self> {
        // Split after the first character, not the first byte: upstream
        // text is not guaranteed ASCII.
        let mut chars = class_type.trim().chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let magnitude: f64 = chars.as_str().parse().ok()?;
        Some(Self { letter, magnitude })
    }

    /// Approximate peak X-ray flux in W/m^2, using the standard decade
    /// per class letter (A = 1e-8 through X = 1e-4). Unknown letters
    /// map to 0 so they sort below every real class.
    pub fn peak_flux(&self) -> f64 {
        let base = match self.letter {
            'A' => 1e-8,
            'B' => 1e-7,
            'C' => 1e-6,
            'M' => 1e-5,
            'X' => 1e-4,
            _ => return 0.0,
        };
        base * self.magnitude
    }
}
