//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production). Per-tick samples go
//! to `debug`; everything else is one `info`/`warn` line.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    failed_deliveries: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries that did not succeed since boot.
    pub fn failed_deliveries(&self) -> u32 {
        self.failed_deliveries
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { device_id } => {
                info!("START | device={}", device_id);
            }
            AppEvent::Sample { tick, vitals, mood } => {
                debug!(
                    "TICK  | #{} | soil={:.1}% light={:.1}% | happiness={} ({})",
                    tick, vitals.soil_pct, vitals.light_pct, vitals.score, mood
                );
            }
            AppEvent::AlertRaised(v) => {
                warn!("ALERT | raised at happiness={}", v.score);
            }
            AppEvent::AlertCleared(v) => {
                info!("ALERT | cleared at happiness={}", v.score);
            }
            AppEvent::WindowEmitted(avg) => {
                info!(
                    "WINDOW| n={} | soil={:.2}% light={:.2}% | happiness={:.1}",
                    avg.samples, avg.soil_pct, avg.light_pct, avg.score
                );
            }
            AppEvent::Delivery { sink, outcome } => {
                if outcome.is_success() {
                    info!("SEND  | {} {}", sink, outcome);
                } else {
                    self.failed_deliveries = self.failed_deliveries.saturating_add(1);
                    warn!(
                        "SEND  | {} {} (failures since boot: {})",
                        sink, outcome, self.failed_deliveries
                    );
                }
            }
        }
    }
}
