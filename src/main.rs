//! PlantPet Firmware — Main Entry Point
//!
//! Hexagonal architecture with a fixed-rate sampling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   BlockingWait    │
//! │  (Sensor+Display)  (EventSink)    (Config)     (Delay+Update)  │
//! │  NetworkAdapter = WifiAdapter + HttpAdapter                    │
//! │  (Connectivity + HttpPort)                                     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Calibration · Score · Aggregator · Alert · Delivery   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The only fatal condition is an exhausted WiFi retry budget; the device
//! answers it with a full restart.
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;

use plantpet::adapters::device_id;
use plantpet::adapters::hardware::HardwareAdapter;
use plantpet::adapters::http::HttpAdapter;
use plantpet::adapters::log_sink::LogEventSink;
use plantpet::adapters::network::NetworkAdapter;
use plantpet::adapters::nvs::NvsAdapter;
use plantpet::adapters::wait::BlockingWait;
use plantpet::adapters::wifi::WifiAdapter;
use plantpet::app::service::AppService;
use plantpet::config::SystemConfig;
use plantpet::drivers::status_led::StatusLed;
use plantpet::drivers::hw_init;
use plantpet::drivers::watchdog::Watchdog;
use plantpet::error::Error;
use plantpet::pins;
use plantpet::provisioning::{self, BuildSecrets};
use plantpet::sensors::{SensorHub, light::LightSensor, soil::SoilProbe};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PlantPet v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;
    let watchdog = Watchdog::new();

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── 3. Resolve config: NVS overlaid with build-time secrets ─
    let secrets = BuildSecrets::from_build_env();
    let config = match NvsAdapter::new()
        .map_err(Error::from)
        .and_then(|nvs| provisioning::resolve_config(&nvs, &secrets))
    {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config unavailable ({}), using defaults", e);
            let mut cfg = SystemConfig::default();
            secrets.apply(&mut cfg);
            cfg.validate()?;
            cfg
        }
    };

    // ── 4. Device identity ────────────────────────────────────
    let mac = device_id::read_mac();
    let dev_id = device_id::device_id(&mac);
    let dev_hostname = device_id::hostname(&mac);
    info!("Device ID: {} (hostname: {})", dev_id, dev_hostname);

    // ── 5. Construct adapters ─────────────────────────────────
    let mut driver = EspWifi::new(peripherals.modem, sysloop, Some(nvs_partition))?;
    if let Err(e) = driver.sta_netif_mut().set_hostname(&dev_hostname) {
        warn!("WiFi: could not set hostname ({})", e);
    }
    let mut wifi = WifiAdapter::new(driver);
    provisioning::provision_link(&mut wifi, &config);

    let mut hw = HardwareAdapter::new(
        SensorHub::new(
            SoilProbe::new(pins::SOIL_ADC_GPIO),
            LightSensor::new(pins::LDR_ADC_GPIO),
        ),
        StatusLed::new(),
    );
    let mut net = NetworkAdapter::new(wifi, HttpAdapter::new());
    let mut wait = BlockingWait::new(watchdog);
    let mut log_sink = LogEventSink::new();

    // ── 6. Construct app service and bring the link up ────────
    let mut app = AppService::new(config.clone(), &dev_id);
    if let Err(e) = app.start(&mut net, &mut wait, &mut log_sink) {
        restart(e);
    }

    info!(
        "System ready. Sampling every {} ms, window {} s, link {} (rssi {:?}).",
        config.sample_interval_ms,
        config.window_secs,
        app.link_state(),
        app.link_rssi()
    );

    // ── 7. Sampling loop ──────────────────────────────────────
    loop {
        match app.tick(&mut hw, &mut net, &mut wait, &mut log_sink) {
            Ok(report) => {
                if let Some(window) = report.window {
                    info!(
                        "Window {} samples → time-series {}, rest {}",
                        window.averages.samples, window.time_series, window.rest
                    );
                }
            }
            Err(e) if e.is_fatal() => restart(e),
            Err(e) => warn!("Tick failed: {}", e),
        }

        wait.watchdog().feed();
        wait.sleep_serviced(config.sample_interval_ms, config.retry.link_poll_ms);
    }
}

fn restart(e: Error) -> ! {
    error!("Fatal: {}, restarting", e);
    esp_idf_hal::reset::restart()
}
