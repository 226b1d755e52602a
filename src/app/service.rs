//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the alert state, the aggregation window and the
//! connectivity manager. All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────────────┐ ──▶ DisplayPort
//!                  │          AppService          │
//!   HttpPort   ◀── │ calibrate · score · aggregate│ ──▶ EventSink
//! ConnectivityPort │ alert · deliver              │
//!                  └──────────────────────────────┘
//! ```
//!
//! One [`tick`](AppService::tick) runs to completion:
//! read → calibrate → score → accumulate → alert check → emit + deliver
//! → render.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::aggregator::{Aggregator, WindowAverages};
use crate::alert::{self, AlertState, AlertTransition};
use crate::config::SystemConfig;
use crate::connectivity::{ConnectivityManager, LinkState};
use crate::delivery::payload;
use crate::delivery::{DeliveryOutcome, DeliveryPolicy, Sink};
use crate::error::{CommsError, Result};
use crate::score::{self, Mood, Vitals};

use super::events::AppEvent;
use super::ports::{
    ConnectivityPort, DisplayPort, EventSink, HttpPort, RawSample, SensorPort, UpdatePort,
};

// ───────────────────────────────────────────────────────────────
// Tick report
// ───────────────────────────────────────────────────────────────

/// Delivery results of one closed aggregation window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowReport {
    pub averages: WindowAverages,
    pub time_series: DeliveryOutcome,
    pub rest: DeliveryOutcome,
}

/// Everything one tick did, for the caller and for tests.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub vitals: Vitals,
    pub mood: Mood,
    pub alert: Option<(AlertTransition, DeliveryOutcome)>,
    pub window: Option<WindowReport>,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    device_id: String,
    alert: AlertState,
    aggregator: Aggregator,
    link: ConnectivityManager,
    delivery: DeliveryPolicy,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the network; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig, device_id: &str) -> Self {
        let aggregator = Aggregator::new(config.window_ticks(), 0);
        let link = ConnectivityManager::new(config.retry);
        Self {
            config,
            device_id: device_id.to_owned(),
            alert: AlertState::default(),
            aggregator,
            link,
            delivery: DeliveryPolicy::new(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the link up before the first tick.
    ///
    /// Missing credentials are logged and tolerated (deliveries will be
    /// skipped); an exhausted retry budget is returned and is fatal.
    pub fn start<N, W>(
        &mut self,
        net: &mut N,
        wait: &mut W,
        sink: &mut impl EventSink,
    ) -> Result<()>
    where
        N: ConnectivityPort,
        W: DelayNs + UpdatePort,
    {
        sink.emit(&AppEvent::Started {
            device_id: self.device_id.clone(),
        });
        info!(
            "AppService started (device={}, window={} ticks)",
            self.device_id,
            self.aggregator.window_ticks()
        );

        match self.link.connect(net, wait) {
            Ok(()) => Ok(()),
            Err(e @ CommsError::RetriesExhausted { .. }) => Err(e.into()),
            Err(e) => {
                warn!("AppService: starting offline: {}", e);
                Ok(())
            }
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full sampling tick.
    ///
    /// Returns `Err` only for the terminal connectivity failure; every
    /// delivery fault is reported inside the [`TickReport`].
    pub fn tick<H, N, W>(
        &mut self,
        hw: &mut H,
        net: &mut N,
        wait: &mut W,
        sink: &mut impl EventSink,
    ) -> Result<TickReport>
    where
        H: SensorPort + DisplayPort,
        N: ConnectivityPort + HttpPort,
        W: DelayNs + UpdatePort,
    {
        self.tick_count += 1;

        // 1. Read + calibrate + score
        let vitals = self.measure(hw.read_raw());
        let mood = Mood::from_score(vitals.score, &self.config.mood_thresholds);
        debug!(
            "tick {}: soil={:.1}% light={:.1}% score={} ({})",
            self.tick_count, vitals.soil_pct, vitals.light_pct, vitals.score, mood
        );
        sink.emit(&AppEvent::Sample {
            tick: self.tick_count,
            vitals,
            mood,
        });

        // 2. Accumulate (unconditionally, before anything can fail)
        self.aggregator.accumulate(&vitals);

        // 3. Alert hysteresis
        let (next, transition) = alert::evaluate(self.alert, &vitals, &self.config.alert);
        let alert = match transition {
            Some(t) => {
                self.alert = next;
                Some((t, self.send_alert(&t, net, wait, sink)?))
            }
            None => None,
        };

        // 4. Window emission
        let window = match self.aggregator.emit(self.tick_count) {
            Some(averages) => Some(self.send_window(averages, net, wait, sink)?),
            None => None,
        };

        // 5. Local feedback
        hw.render(mood, &vitals);

        Ok(TickReport {
            tick: self.tick_count,
            vitals,
            mood,
            alert,
            window,
        })
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn alert_state(&self) -> AlertState {
        self.alert
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Signal strength (dBm) sampled when the link last came up.
    pub fn link_rssi(&self) -> Option<i8> {
        self.link.last_rssi()
    }

    /// Total sampling ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Samples accumulated in the open window.
    pub fn pending_samples(&self) -> u32 {
        self.aggregator.window().count()
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn measure(&self, raw: RawSample) -> Vitals {
        let soil_pct = self.config.soil_calibration.to_percent(raw.soil);
        let light_pct = self.config.light_calibration.to_percent(raw.light);
        Vitals {
            soil_pct,
            light_pct,
            score: score::score(soil_pct, light_pct, &self.config.score_weights),
        }
    }

    fn send_alert<N, W>(
        &mut self,
        transition: &AlertTransition,
        net: &mut N,
        wait: &mut W,
        sink: &mut impl EventSink,
    ) -> Result<DeliveryOutcome>
    where
        N: ConnectivityPort + HttpPort,
        W: DelayNs + UpdatePort,
    {
        sink.emit(&match transition {
            AlertTransition::Degraded(v) => AppEvent::AlertRaised(*v),
            AlertTransition::Recovered(v) => AppEvent::AlertCleared(*v),
        });
        let request = payload::alert_request(&self.config.alert_sink, &self.device_id, transition);
        let outcome = self
            .delivery
            .deliver(Sink::Alert, &request, &mut self.link, net, wait)?;
        sink.emit(&AppEvent::Delivery {
            sink: Sink::Alert,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    /// Deliver one closed window to both telemetry sinks. The window is
    /// already cleared; a failure at one sink never blocks the other.
    fn send_window<N, W>(
        &mut self,
        averages: WindowAverages,
        net: &mut N,
        wait: &mut W,
        sink: &mut impl EventSink,
    ) -> Result<WindowReport>
    where
        N: ConnectivityPort + HttpPort,
        W: DelayNs + UpdatePort,
    {
        info!(
            "Window closed: {} samples, soil={:.2}% light={:.2}% score={:.1}",
            averages.samples, averages.soil_pct, averages.light_pct, averages.score
        );
        sink.emit(&AppEvent::WindowEmitted(averages));

        let request =
            payload::time_series_request(&self.config.time_series, &self.device_id, &averages);
        let time_series =
            self.delivery
                .deliver(Sink::TimeSeries, &request, &mut self.link, net, wait)?;
        sink.emit(&AppEvent::Delivery {
            sink: Sink::TimeSeries,
            outcome: time_series.clone(),
        });

        let request = payload::rest_request(&self.config.rest, &self.device_id, &averages);
        let rest = self
            .delivery
            .deliver(Sink::Rest, &request, &mut self.link, net, wait)?;
        sink.emit(&AppEvent::Delivery {
            sink: Sink::Rest,
            outcome: rest.clone(),
        });

        Ok(WindowReport {
            averages,
            time_series,
            rest,
        })
    }
}
