//! Blocking-wait adapter.
//!
//! Implements [`DelayNs`] and [`UpdatePort`] for the bounded waits of the
//! connectivity manager and the sampling loop. Every poll feeds the task
//! watchdog, so a long link-up wait never trips it.
//!
//! Firmware-update delivery itself is not part of this crate; the update
//! hook only records that the channel got a chance to run.

use embedded_hal::delay::DelayNs;
use log::trace;

use crate::app::ports::UpdatePort;
use crate::drivers::watchdog::Watchdog;

pub struct BlockingWait {
    watchdog: Watchdog,
    update_polls: u64,
}

impl BlockingWait {
    pub fn new(watchdog: Watchdog) -> Self {
        Self {
            watchdog,
            update_polls: 0,
        }
    }

    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }

    pub fn update_polls(&self) -> u64 {
        self.update_polls
    }

    /// Sleep `total_ms`, waking every `poll_ms` to service updates.
    pub fn sleep_serviced(&mut self, total_ms: u32, poll_ms: u32) {
        let poll_ms = poll_ms.max(1);
        let mut remaining = total_ms;
        while remaining > 0 {
            let step = remaining.min(poll_ms);
            self.delay_ms(step);
            self.service_updates();
            remaining -= step;
        }
    }
}

impl DelayNs for BlockingWait {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::FreeRtos.delay_ns(ns);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

impl UpdatePort for BlockingWait {
    fn service_updates(&mut self) {
        self.update_polls += 1;
        self.watchdog.feed();
        trace!("Wait: update poll {}", self.update_polls);
    }
}
