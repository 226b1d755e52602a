//! Composite happiness score and mood classification.

use core::fmt;

use crate::config::{MoodThresholds, ScoreWeights};

/// Calibrated readings and the composite score for one sampling tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vitals {
    /// Soil moisture, 0–100 %.
    pub soil_pct: f32,
    /// Ambient light, 0–100 %.
    pub light_pct: f32,
    /// Composite score, 0–100.
    pub score: u8,
}

/// Weighted sum of the two readings, truncated to an integer.
///
/// Inputs are expected in `[0, 100]` and weights to sum to 1; the result
/// is clamped anyway so float rounding can never leave the range.
pub fn score(soil_pct: f32, light_pct: f32, weights: &ScoreWeights) -> u8 {
    let raw = weights.soil * soil_pct + weights.light * light_pct;
    raw.clamp(0.0, 100.0) as u8
}

/// Mood shown on the local display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Ok,
    Angry,
    Dead,
}

impl Mood {
    pub fn from_score(score: u8, thresholds: &MoodThresholds) -> Self {
        if score >= thresholds.happy {
            Self::Happy
        } else if score >= thresholds.ok {
            Self::Ok
        } else if score >= thresholds.angry {
            Self::Angry
        } else {
            Self::Dead
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Happy => write!(f, "HAPPY"),
            Self::Ok => write!(f, "OK"),
            Self::Angry => write!(f, "ANGRY"),
            Self::Dead => write!(f, "DEAD"),
        }
    }
}
