//! GPIO / peripheral pin assignments for the PlantPet board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// Capacitive soil-moisture probe. Wetter soil reads a *lower* code.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const SOIL_ADC_GPIO: i32 = 1;

/// LDR voltage divider. Brighter light reads a *higher* code.
/// ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const LDR_ADC_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Mood LED (discrete RGB, common cathode)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

/// LEDC frequency for the mood LED (1 kHz, 8-bit duty).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
