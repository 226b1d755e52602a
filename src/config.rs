//! System configuration parameters
//!
//! All tunable parameters for the PlantPet system: calibration profiles,
//! scoring weights, alert hysteresis, timing, connectivity retry policy and
//! the remote sink endpoints. Values can be overridden via NVS.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Two-point linear calibration for one analog channel.
///
/// `low_raw` maps to 0 %, `high_raw` to 100 %. The two may run in either
/// numeric direction (soil probes read *lower* when wetter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    pub low_raw: u16,
    pub high_raw: u16,
}

/// Weights of the composite happiness score. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub soil: f32,
    pub light: f32,
}

/// Lower bounds (inclusive) of each mood band on the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodThresholds {
    pub happy: u8,
    pub ok: u8,
    pub angry: u8,
}

/// Alert hysteresis: degrade below `threshold`, recover above
/// `threshold + recovery_margin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPolicy {
    pub threshold: u8,
    pub recovery_margin: u8,
}

/// Bounded-retry policy for WiFi association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Association attempts before the terminal restart path.
    pub max_connect_attempts: u8,
    /// Maximum wait for link-up after each attempt (milliseconds).
    pub link_timeout_ms: u32,
    /// Poll period while waiting for link-up (milliseconds).
    pub link_poll_ms: u32,
}

/// InfluxDB v2 write endpoint (line protocol).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesEndpoint {
    pub base_url: String,
    pub org: String,
    pub bucket: String,
    pub token: String,
    pub measurement: String,
}

/// REST table insert endpoint (PostgREST-style).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestEndpoint {
    pub base_url: String,
    pub table: String,
    pub api_key: String,
}

/// Push-notification endpoint for alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEndpoint {
    pub url: String,
    pub api_token: String,
    pub user_key: String,
    pub degraded_sound: String,
    pub recovered_sound: String,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Calibration ---
    /// Soil probe: dry raw code → 0 %, wet raw code → 100 %.
    pub soil_calibration: CalibrationProfile,
    /// LDR divider: dark raw code → 0 %, bright raw code → 100 %.
    pub light_calibration: CalibrationProfile,

    // --- Scoring ---
    pub score_weights: ScoreWeights,
    pub mood_thresholds: MoodThresholds,
    pub alert: AlertPolicy,

    // --- Timing ---
    /// Sampling tick interval (milliseconds)
    pub sample_interval_ms: u32,
    /// Aggregation window length (seconds)
    pub window_secs: u32,

    // --- Connectivity ---
    pub retry: RetryPolicy,
    pub wifi_ssid: String,
    pub wifi_password: String,

    // --- Sinks ---
    pub time_series: TimeSeriesEndpoint,
    pub rest: RestEndpoint,
    pub alert_sink: AlertEndpoint,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Calibration
            soil_calibration: CalibrationProfile {
                low_raw: 2300, // dry
                high_raw: 700, // wet
            },
            light_calibration: CalibrationProfile {
                low_raw: 450,   // dark
                high_raw: 3000, // bright
            },

            // Scoring
            score_weights: ScoreWeights {
                soil: 0.75,
                light: 0.25,
            },
            mood_thresholds: MoodThresholds {
                happy: 70,
                ok: 45,
                angry: 25,
            },
            alert: AlertPolicy {
                threshold: 40,
                recovery_margin: 5,
            },

            // Timing
            sample_interval_ms: 5000, // 0.2 Hz
            window_secs: 600,         // 10 min

            // Connectivity
            retry: RetryPolicy {
                max_connect_attempts: 5,
                link_timeout_ms: 10_000,
                link_poll_ms: 250,
            },
            wifi_ssid: String::new(),
            wifi_password: String::new(),

            // Sinks
            time_series: TimeSeriesEndpoint {
                base_url: "https://us-east-1-1.aws.cloud2.influxdata.com".into(),
                org: "PlantPet".into(),
                bucket: "PlantPet".into(),
                token: String::new(),
                measurement: "plant_status".into(),
            },
            rest: RestEndpoint {
                base_url: String::new(),
                table: "plant_readings".into(),
                api_key: String::new(),
            },
            alert_sink: AlertEndpoint {
                url: "https://api.pushover.net/1/messages.json".into(),
                api_token: String::new(),
                user_key: String::new(),
                degraded_sound: "siren".into(),
                recovered_sound: "magic".into(),
            },
        }
    }
}

impl SystemConfig {
    /// Number of sampling ticks in one aggregation window (at least 1).
    pub fn window_ticks(&self) -> u64 {
        let interval = u64::from(self.sample_interval_ms.max(1));
        (u64::from(self.window_secs) * 1000 / interval).max(1)
    }

    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for profile in [self.soil_calibration, self.light_calibration] {
            if profile.low_raw == profile.high_raw {
                return Err(ConfigError::ValidationFailed(
                    "calibration low_raw and high_raw must differ",
                ));
            }
        }

        let w = self.score_weights;
        if w.soil < 0.0 || w.light < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "score weights must be non-negative",
            ));
        }
        if ((w.soil + w.light) - 1.0).abs() > 0.001 {
            return Err(ConfigError::ValidationFailed("score weights must sum to 1"));
        }

        let m = self.mood_thresholds;
        if !(m.happy <= 100 && m.happy > m.ok && m.ok > m.angry) {
            return Err(ConfigError::ValidationFailed(
                "mood thresholds must satisfy 100 >= happy > ok > angry",
            ));
        }

        if u16::from(self.alert.threshold) + u16::from(self.alert.recovery_margin) > 100 {
            return Err(ConfigError::ValidationFailed(
                "alert threshold + recovery_margin must be <= 100",
            ));
        }

        if !(100..=600_000).contains(&self.sample_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "sample_interval_ms must be 100–600000",
            ));
        }
        if !(60..=86_400).contains(&self.window_secs) {
            return Err(ConfigError::ValidationFailed(
                "window_secs must be 60–86400",
            ));
        }
        if u64::from(self.window_secs) * 1000 < u64::from(self.sample_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "window must span at least one sample interval",
            ));
        }

        let r = self.retry;
        if !(1..=20).contains(&r.max_connect_attempts) {
            return Err(ConfigError::ValidationFailed(
                "max_connect_attempts must be 1–20",
            ));
        }
        if r.link_poll_ms == 0 || r.link_poll_ms > r.link_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "link_poll_ms must be 1..=link_timeout_ms",
            ));
        }
        if r.link_timeout_ms > 60_000 {
            return Err(ConfigError::ValidationFailed(
                "link_timeout_ms must be <= 60000",
            ));
        }

        Ok(())
    }
}
