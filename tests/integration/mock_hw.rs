//! Mock adapters for integration tests.
//!
//! Every port call is recorded so tests can assert on the full history
//! without touching real ADC, LED, WiFi or HTTP peripherals.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use plantpet::app::events::AppEvent;
use plantpet::app::ports::{
    ConnectivityError, ConnectivityPort, DisplayPort, EventSink, HttpPort, HttpRequest,
    HttpResponse, RawSample, SensorPort, TransportError, UpdatePort,
};
use plantpet::config::SystemConfig;
use plantpet::score::{Mood, Vitals};

// ── Test configuration ────────────────────────────────────────

/// Default config with a 3-tick window and a soil-only score, so a raw
/// soil code maps straight onto a predictable score.
pub fn test_config() -> SystemConfig {
    let mut cfg = SystemConfig::default();
    cfg.sample_interval_ms = 20_000;
    cfg.window_secs = 60;
    cfg.score_weights.soil = 1.0;
    cfg.score_weights.light = 0.0;
    cfg.retry.max_connect_attempts = 3;
    cfg.retry.link_timeout_ms = 1_000;
    cfg.retry.link_poll_ms = 250;
    cfg.wifi_ssid = "Greenhouse".into();
    cfg.wifi_password = "password1".into();
    cfg
}

/// Soil code whose calibrated percentage is `score + 0.5` under the
/// default soil profile (2300 dry → 700 wet), i.e. it scores `score`.
pub fn soil_raw_for(score: u8) -> u16 {
    2300 - (u16::from(score) * 16 + 8)
}

pub const WET: u16 = 700;
pub const BRIGHT: u16 = 3000;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Samples returned in order; the last one repeats forever.
    script: VecDeque<RawSample>,
    last: RawSample,
    pub reads: usize,
    pub renders: Vec<(Mood, Vitals)>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn constant(soil: u16, light: u16) -> Self {
        Self::scripted(&[(soil, light)])
    }

    pub fn scripted(samples: &[(u16, u16)]) -> Self {
        Self {
            script: samples
                .iter()
                .map(|&(soil, light)| RawSample { soil, light })
                .collect(),
            last: RawSample::default(),
            reads: 0,
            renders: Vec::new(),
        }
    }

    /// Soil-only scores, light held dark.
    pub fn scores(scores: &[u8]) -> Self {
        let samples: Vec<(u16, u16)> = scores.iter().map(|&s| (soil_raw_for(s), 450)).collect();
        Self::scripted(&samples)
    }

    pub fn last_mood(&self) -> Option<Mood> {
        self.renders.last().map(|(m, _)| *m)
    }
}

impl SensorPort for MockHardware {
    fn read_raw(&mut self) -> RawSample {
        self.reads += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

impl DisplayPort for MockHardware {
    fn render(&mut self, mood: Mood, vitals: &Vitals) {
        self.renders.push((mood, *vitals));
    }
}

// ── MockNet ───────────────────────────────────────────────────

/// How the fake access point behaves after `begin_connect()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApBehaviour {
    /// Link comes up immediately.
    Available,
    /// Link never comes up.
    Unreachable,
}

pub struct MockNet {
    pub link_up: bool,
    pub ap: ApBehaviour,
    pub has_credentials: bool,
    pub begins: u32,
    pub disconnects: u32,
    pub requests: Vec<HttpRequest>,
    /// Scripted responses, consumed in order; afterwards each sink's
    /// success status is returned.
    pub responses: VecDeque<Result<u16, TransportError>>,
}

#[allow(dead_code)]
impl MockNet {
    pub fn online() -> Self {
        Self {
            link_up: true,
            ap: ApBehaviour::Available,
            has_credentials: true,
            begins: 0,
            disconnects: 0,
            requests: Vec::new(),
            responses: VecDeque::new(),
        }
    }

    pub fn offline(ap: ApBehaviour) -> Self {
        Self {
            link_up: false,
            ap,
            ..Self::online()
        }
    }

    pub fn respond(&mut self, result: Result<u16, TransportError>) {
        self.responses.push_back(result);
    }

    pub fn urls(&self) -> Vec<&str> {
        self.requests.iter().map(|r| r.url.as_str()).collect()
    }
}

impl ConnectivityPort for MockNet {
    fn begin_connect(&mut self) -> Result<(), ConnectivityError> {
        if !self.has_credentials {
            return Err(ConnectivityError::NoCredentials);
        }
        self.begins += 1;
        self.link_up = self.ap == ApBehaviour::Available;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
        self.link_up = false;
    }

    fn is_connected(&self) -> bool {
        self.link_up
    }

    fn set_credentials(&mut self, _ssid: &str, _password: &str) -> Result<(), ConnectivityError> {
        self.has_credentials = true;
        Ok(())
    }

    fn rssi(&self) -> Option<i8> {
        self.link_up.then_some(-55)
    }
}

impl HttpPort for MockNet {
    fn post(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.push(request.clone());
        let status = match self.responses.pop_front() {
            Some(scripted) => scripted?,
            None => match request.content_type {
                "application/x-www-form-urlencoded" => 200,
                "application/json" => 201,
                _ => 204,
            },
        };
        Ok(HttpResponse {
            status,
            body: format!("status {status}"),
        })
    }
}

// ── MockWait ──────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockWait {
    pub slept_ms: u64,
    pub update_polls: u32,
}

impl DelayNs for MockWait {
    fn delay_ns(&mut self, ns: u32) {
        self.slept_ms += u64::from(ns) / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.slept_ms += u64::from(ms);
    }
}

impl UpdatePort for MockWait {
    fn service_updates(&mut self) {
        self.update_polls += 1;
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
