//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them (serial log today).

use crate::aggregator::WindowAverages;
use crate::delivery::{DeliveryOutcome, Sink};
use crate::score::{Mood, Vitals};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The application service has started.
    Started { device_id: String },

    /// One sampling tick completed.
    Sample { tick: u64, vitals: Vitals, mood: Mood },

    /// Score fell below the alert threshold.
    AlertRaised(Vitals),

    /// Score climbed back above threshold + margin.
    AlertCleared(Vitals),

    /// An aggregation window closed.
    WindowEmitted(WindowAverages),

    /// A delivery attempt finished (successfully or not).
    Delivery { sink: Sink, outcome: DeliveryOutcome },
}
