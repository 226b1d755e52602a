//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements            | Connects to                 |
//! |-------------|-----------------------|-----------------------------|
//! | `hardware`  | SensorPort            | ESP32 ADC1 (soil, LDR)      |
//! |             | DisplayPort           | RGB mood LED (LEDC)         |
//! | `http`      | HttpPort              | ESP-IDF HTTPS client        |
//! | `log_sink`  | EventSink             | Serial log output           |
//! | `network`   | ConnectivityPort      | `wifi` + `http` combined    |
//! |             | HttpPort              |                             |
//! | `nvs`       | ConfigPort            | NVS / in-memory store       |
//! | `wait`      | DelayNs + UpdatePort  | FreeRTOS delay, TWDT        |
//! | `wifi`      | ConnectivityPort      | ESP-IDF WiFi STA            |
//!
//! `device_id` derives the station identity from the factory MAC.

pub mod device_id;
pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod network;
pub mod nvs;
pub mod wait;
pub mod wifi;
