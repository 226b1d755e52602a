//! First-boot provisioning: where the running configuration comes from.
//!
//! Secrets are baked into the image at build time from `PLANTPET_*`
//! environment variables:
//!
//! | Variable                  | Field                          |
//! |---------------------------|--------------------------------|
//! | `PLANTPET_WIFI_SSID`      | `wifi_ssid`                    |
//! | `PLANTPET_WIFI_PASSWORD`  | `wifi_password`                |
//! | `PLANTPET_INFLUX_URL`     | `time_series.base_url`         |
//! | `PLANTPET_INFLUX_TOKEN`   | `time_series.token`            |
//! | `PLANTPET_REST_URL`       | `rest.base_url`                |
//! | `PLANTPET_REST_API_KEY`   | `rest.api_key`                 |
//! | `PLANTPET_PUSHOVER_TOKEN` | `alert_sink.api_token`         |
//! | `PLANTPET_PUSHOVER_USER`  | `alert_sink.user_key`          |
//!
//! At boot the stored NVS config is loaded (defaults when none is stored),
//! every secret present in the image is laid over it, and the result is
//! written back when it changed. A device flashed once with secrets keeps
//! them across later images built without.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, ConnectivityPort};
use crate::config::SystemConfig;
use crate::error::Result;

/// Secrets captured from the build environment. `None` leaves the
/// stored value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSecrets {
    pub wifi_ssid: Option<&'static str>,
    pub wifi_password: Option<&'static str>,
    pub influx_url: Option<&'static str>,
    pub influx_token: Option<&'static str>,
    pub rest_url: Option<&'static str>,
    pub rest_api_key: Option<&'static str>,
    pub pushover_token: Option<&'static str>,
    pub pushover_user: Option<&'static str>,
}

impl BuildSecrets {
    pub const fn from_build_env() -> Self {
        Self {
            wifi_ssid: option_env!("PLANTPET_WIFI_SSID"),
            wifi_password: option_env!("PLANTPET_WIFI_PASSWORD"),
            influx_url: option_env!("PLANTPET_INFLUX_URL"),
            influx_token: option_env!("PLANTPET_INFLUX_TOKEN"),
            rest_url: option_env!("PLANTPET_REST_URL"),
            rest_api_key: option_env!("PLANTPET_REST_API_KEY"),
            pushover_token: option_env!("PLANTPET_PUSHOVER_TOKEN"),
            pushover_user: option_env!("PLANTPET_PUSHOVER_USER"),
        }
    }

    /// Lay every present secret over `config`. Returns true if anything
    /// changed.
    pub fn apply(&self, config: &mut SystemConfig) -> bool {
        let fields: [(Option<&'static str>, &mut String); 8] = [
            (self.wifi_ssid, &mut config.wifi_ssid),
            (self.wifi_password, &mut config.wifi_password),
            (self.influx_url, &mut config.time_series.base_url),
            (self.influx_token, &mut config.time_series.token),
            (self.rest_url, &mut config.rest.base_url),
            (self.rest_api_key, &mut config.rest.api_key),
            (self.pushover_token, &mut config.alert_sink.api_token),
            (self.pushover_user, &mut config.alert_sink.user_key),
        ];
        let mut changed = false;
        for (secret, field) in fields {
            if let Some(value) = secret.filter(|v| !v.is_empty())
                && field.as_str() != value
            {
                value.clone_into(field);
                changed = true;
            }
        }
        changed
    }
}

/// Settings the device cannot do its job without, by name.
pub fn missing_secrets(config: &SystemConfig) -> heapless::Vec<&'static str, 8> {
    let required = [
        ("wifi_ssid", &config.wifi_ssid),
        ("time_series.base_url", &config.time_series.base_url),
        ("time_series.token", &config.time_series.token),
        ("rest.base_url", &config.rest.base_url),
        ("rest.api_key", &config.rest.api_key),
        ("alert_sink.api_token", &config.alert_sink.api_token),
        ("alert_sink.user_key", &config.alert_sink.user_key),
    ];
    let mut missing = heapless::Vec::new();
    for (name, value) in required {
        if value.is_empty() {
            // Capacity matches the table above.
            let _ = missing.push(name);
        }
    }
    missing
}

/// Produce the running configuration from the store and the image secrets.
///
/// A corrupted blob is replaced; a storage I/O failure is returned as
/// [`Error::Config`](crate::error::Error::Config) and the caller decides
/// whether to run on defaults.
pub fn resolve_config(store: &impl ConfigPort, secrets: &BuildSecrets) -> Result<SystemConfig> {
    let (mut config, mut dirty) = match store.load() {
        Ok(cfg) => (cfg, false),
        Err(ConfigError::Corrupted | ConfigError::ValidationFailed(_)) => {
            warn!("Provisioning: stored config unusable, rebuilding from defaults");
            (SystemConfig::default(), true)
        }
        Err(e) => return Err(e.into()),
    };

    if secrets.apply(&mut config) {
        info!("Provisioning: build-time secrets applied");
        dirty = true;
    }
    config.validate()?;

    if dirty {
        if let Err(e) = store.save(&config) {
            warn!("Provisioning: could not persist config ({})", e);
        }
    }

    for name in missing_secrets(&config) {
        warn!("Provisioning: {} is not set", name);
    }
    Ok(config)
}

/// Hand the configured WiFi credentials to the link. Returns false when
/// the device has to run offline.
pub fn provision_link(link: &mut impl ConnectivityPort, config: &SystemConfig) -> bool {
    if config.wifi_ssid.is_empty() {
        warn!("Provisioning: no WiFi credentials, running offline");
        return false;
    }
    match link.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        Ok(()) => true,
        Err(e) => {
            warn!("Provisioning: WiFi credentials rejected: {}", e);
            false
        }
    }
}
