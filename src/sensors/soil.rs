//! Capacitive soil-moisture probe.
//!
//! The probe's output voltage falls as water content rises, so a wet pot
//! reads a *low* ADC code. Mapping to a percentage is the calibration
//! module's job; this driver only delivers the raw code.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: oversampled ADC1_CH0 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// Simulation default: roughly half-way between dry and wet.
static SIM_SOIL_ADC: AtomicU16 = AtomicU16::new(1500);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_soil_adc(raw: u16) {
    SIM_SOIL_ADC.store(raw, Ordering::Relaxed);
}

/// Conversions averaged per reading.
#[cfg(target_os = "espidf")]
const OVERSAMPLE: u32 = 8;

pub struct SoilProbe {
    _adc_gpio: i32,
}

impl SoilProbe {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            _adc_gpio: adc_gpio,
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn read_raw(&mut self) -> u16 {
        let sum: u32 = (0..OVERSAMPLE)
            .map(|_| u32::from(hw_init::adc1_read(hw_init::ADC1_CH_SOIL)))
            .sum();
        (sum / OVERSAMPLE) as u16
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&mut self) -> u16 {
        SIM_SOIL_ADC.load(Ordering::Relaxed)
    }
}
