//! Two-point linear calibration of raw ADC codes.
//!
//! Maps a raw reading onto `[0, 100]` % and clamps. Out-of-range raw codes
//! (probe drift, a disconnected sensor pinned to a rail) are not errors;
//! they saturate at 0 % or 100 %.

use crate::config::CalibrationProfile;

/// Map `raw` linearly from `[low_raw, high_raw]` onto `[0, 100]` and clamp.
///
/// `low_raw` may be numerically greater than `high_raw`. A degenerate
/// profile (`low_raw == high_raw`) yields `0.0`.
pub fn to_percent(raw: u16, low_raw: u16, high_raw: u16) -> f32 {
    let span = f32::from(high_raw) - f32::from(low_raw);
    if span == 0.0 {
        return 0.0;
    }
    let pct = (f32::from(raw) - f32::from(low_raw)) / span * 100.0;
    pct.clamp(0.0, 100.0)
}

impl CalibrationProfile {
    pub fn to_percent(&self, raw: u16) -> f32 {
        to_percent(raw, self.low_raw, self.high_raw)
    }
}
