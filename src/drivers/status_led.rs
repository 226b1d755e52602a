//! RGB mood LED driver.
//!
//! Three LEDC PWM channels drive a common-cathode RGB LED whose colour
//! tracks the plant's mood.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::score::Mood;

pub type Rgb = (u8, u8, u8);

/// Colour shown for each mood.
pub fn mood_colour(mood: Mood) -> Rgb {
    match mood {
        Mood::Happy => (0, 200, 40),
        Mood::Ok => (180, 160, 0),
        Mood::Angry => (220, 60, 0),
        Mood::Dead => (40, 0, 0),
    }
}

pub struct StatusLed {
    current: Rgb,
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLed {
    pub fn new() -> Self {
        Self { current: (0, 0, 0) }
    }

    pub fn set_colour(&mut self, (r, g, b): Rgb) {
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, b);
        self.current = (r, g, b);
    }

    pub fn off(&mut self) {
        self.set_colour((0, 0, 0));
    }

    pub fn current_colour(&self) -> Rgb {
        self.current
    }
}
