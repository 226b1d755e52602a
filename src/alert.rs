//! Alert hysteresis over the composite score.
//!
//! ```text
//!            score < threshold
//!   NORMAL ─────────────────────▶ ALERTING
//!     ▲                              │
//!     └──────────────────────────────┘
//!        score > threshold + margin
//! ```
//!
//! Inside the band `[threshold, threshold + margin]` nothing happens, and
//! nothing happens when the machine is already in the target state. A
//! score hovering around the threshold therefore raises one alert per
//! excursion, not one per tick.
//!
//! The state is a plain value: the caller owns it, passes it in and stores
//! what comes back.

use log::{info, warn};

use crate::config::AlertPolicy;
use crate::score::Vitals;

/// Whether a degraded notification is currently outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertState {
    pub alerted: bool,
}

/// A state change that must be announced to the alert sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertTransition {
    Degraded(Vitals),
    Recovered(Vitals),
}

/// Evaluate one tick. Returns the next state and the transition, if any.
pub fn evaluate(
    state: AlertState,
    vitals: &Vitals,
    policy: &AlertPolicy,
) -> (AlertState, Option<AlertTransition>) {
    let recover_above = u16::from(policy.threshold) + u16::from(policy.recovery_margin);

    if !state.alerted && vitals.score < policy.threshold {
        warn!(
            "ALERT: score {} below threshold {}",
            vitals.score, policy.threshold
        );
        return (
            AlertState { alerted: true },
            Some(AlertTransition::Degraded(*vitals)),
        );
    }

    if state.alerted && u16::from(vitals.score) > recover_above {
        info!("ALERT: score {} recovered above {}", vitals.score, recover_above);
        return (
            AlertState { alerted: false },
            Some(AlertTransition::Recovered(*vitals)),
        );
    }

    (state, None)
}
