//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the mood LED, exposing them through
//! [`SensorPort`] and [`DisplayPort`]. On non-espidf targets the underlying
//! drivers use cfg-gated simulation stubs.

use log::{debug, info};

use crate::app::ports::{DisplayPort, RawSample, SensorPort};
use crate::drivers::status_led::{StatusLed, mood_colour};
use crate::score::{Mood, Vitals};
use crate::sensors::SensorHub;

pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    led: StatusLed,
    shown: Option<Mood>,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, led: StatusLed) -> Self {
        Self {
            sensor_hub,
            led,
            shown: None,
        }
    }

    /// Mood currently on display, if anything was rendered yet.
    pub fn shown(&self) -> Option<Mood> {
        self.shown
    }

    pub fn led(&self) -> &StatusLed {
        &self.led
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_raw(&mut self) -> RawSample {
        self.sensor_hub.read_all()
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl DisplayPort for HardwareAdapter {
    fn render(&mut self, mood: Mood, vitals: &Vitals) {
        if self.shown != Some(mood) {
            info!("Display: mood {} (score {})", mood, vitals.score);
            self.led.set_colour(mood_colour(mood));
            self.shown = Some(mood);
        }
        debug!(
            "Display: [{}] soil {:.0}% light {:.0}% happy {}%",
            mood, vitals.soil_pct, vitals.light_pct, vitals.score
        );
    }
}
