//! LDR ambient-light sensor (photoresistor on the high side of a divider).
//!
//! More light lowers the LDR resistance and raises the ADC code.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: oversampled ADC1_CH1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

static SIM_LDR_ADC: AtomicU16 = AtomicU16::new(1700);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_ldr_adc(raw: u16) {
    SIM_LDR_ADC.store(raw, Ordering::Relaxed);
}

#[cfg(target_os = "espidf")]
const OVERSAMPLE: u32 = 8;

pub struct LightSensor {
    _adc_gpio: i32,
}

impl LightSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            _adc_gpio: adc_gpio,
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn read_raw(&mut self) -> u16 {
        let sum: u32 = (0..OVERSAMPLE)
            .map(|_| u32::from(hw_init::adc1_read(hw_init::ADC1_CH_LDR)))
            .sum();
        (sum / OVERSAMPLE) as u16
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&mut self) -> u16 {
        SIM_LDR_ADC.load(Ordering::Relaxed)
    }
}
