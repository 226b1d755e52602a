//! PlantPet firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod aggregator;
pub mod alert;
pub mod app;
pub mod calibration;
pub mod config;
pub mod connectivity;
pub mod delivery;
pub mod error;
pub mod provisioning;
pub mod score;

pub mod pins;

// The hardware-facing modules compile on every target; the real
// implementations are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;
