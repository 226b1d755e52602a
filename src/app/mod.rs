//! Application core — pure domain orchestration, zero I/O.
//!
//! The [`service::AppService`] runs the sampling pipeline: calibration,
//! scoring, windowed aggregation, alert hysteresis and delivery. All
//! interaction with hardware and the network happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod events;
pub mod ports;
pub mod service;
