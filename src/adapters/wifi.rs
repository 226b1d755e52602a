//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`]: the hexagonal boundary for link-level
//! control. The adapter only *starts* associations; the
//! [`ConnectivityManager`](crate::connectivity::ConnectivityManager) owns
//! the bounded wait and the retry budget.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation link for host-side tests.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{ConnectivityError, ConnectivityPort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    #[cfg(target_os = "espidf")]
    driver: EspWifi<'static>,
    #[cfg(target_os = "espidf")]
    started: bool,
    /// Simulation: association in progress or established.
    #[cfg(not(target_os = "espidf"))]
    associated: bool,
    /// Simulation: whether the access point answers at all.
    #[cfg(not(target_os = "espidf"))]
    ap_available: bool,
    /// Simulation: begin_connect() calls so far.
    #[cfg(not(target_os = "espidf"))]
    sim_begins: u32,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(driver: EspWifi<'static>) -> Self {
        Self {
            driver,
            started: false,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            associated: false,
            ap_available: true,
            sim_begins: 0,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        }
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_begin(&mut self) -> Result<(), ConnectivityError> {
        if !self.started {
            let auth_method = if self.password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            };
            let config = Configuration::Client(ClientConfiguration {
                ssid: self.ssid.clone(),
                password: self.password.clone(),
                auth_method,
                ..Default::default()
            });
            self.driver.set_configuration(&config).map_err(|e| {
                warn!("WiFi(espidf): set_configuration failed: {}", e);
                ConnectivityError::ConnectionFailed
            })?;
            self.driver.start().map_err(|e| {
                warn!("WiFi(espidf): start failed: {}", e);
                ConnectivityError::ConnectionFailed
            })?;
            self.started = true;
        }
        // Non-blocking: link-up is observed through is_connected().
        self.driver.connect().map_err(|e| {
            warn!("WiFi(espidf): connect failed: {}", e);
            ConnectivityError::ConnectionFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_begin(&mut self) -> Result<(), ConnectivityError> {
        self.sim_begins = self.sim_begins.wrapping_add(1);
        self.associated = true;
        info!(
            "WiFi(sim): associating with '{}' (attempt {})",
            self.ssid, self.sim_begins
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.driver.disconnect() {
            warn!("WiFi(espidf): disconnect failed: {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.associated = false;
    }

    /// Associated *and* the station interface has an address.
    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.driver.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.associated && self.ap_available
    }

    #[cfg(target_os = "espidf")]
    fn platform_rssi(&self) -> Option<i8> {
        let mut ap_info = esp_idf_svc::sys::wifi_ap_record_t::default();
        // SAFETY: writes into a caller-owned record; only valid while associated.
        let ret = unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap_info) };
        (ret == esp_idf_svc::sys::ESP_OK as i32).then_some(ap_info.rssi)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_rssi(&self) -> Option<i8> {
        let oscillation = (self.sim_begins % 12) as i8 - 6;
        Some((-60_i8).saturating_add(oscillation))
    }

    // ── Simulation controls ───────────────────────────────────

    /// Simulation: make the access point reachable or unreachable.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_ap_available(&mut self, available: bool) {
        self.ap_available = available;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_begins(&self) -> u32 {
        self.sim_begins
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn begin_connect(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        self.platform_begin()
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        info!("WiFi: disconnected");
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid
            .push_str(ssid)
            .map_err(|()| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|()| ConnectivityError::InvalidPassword)?;
        #[cfg(target_os = "espidf")]
        {
            // Force a fresh set_configuration() on the next attempt.
            self.started = false;
        }
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    fn rssi(&self) -> Option<i8> {
        if self.platform_is_connected() {
            self.platform_rssi()
        } else {
            None
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
