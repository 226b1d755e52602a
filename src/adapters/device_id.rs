//! Device identity derived from the ESP32 factory MAC address.
//!
//! Produces a stable device ID in the form `PP-XXYYZZ` (last 3 bytes of
//! the 6-byte MAC in uppercase hex). The ID tags every telemetry point and
//! REST row and prefixes alert titles; the lowercase hostname
//! (`plantpet-xxyyzz`) names the station on the network.

use core::fmt::Write;

/// "PP-XXYYZZ" fits with room to spare.
pub type DeviceIdString = heapless::String<16>;

pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: writes exactly 6 bytes into the caller-owned buffer.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

pub fn device_id(mac: &MacAddress) -> DeviceIdString {
    let mut id = DeviceIdString::new();
    let _ = write!(id, "PP-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
    id
}

pub fn hostname(mac: &MacAddress) -> heapless::String<24> {
    let mut name = heapless::String::<24>::new();
    let _ = write!(name, "plantpet-{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5]);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_format() {
        let mac = [0x00, 0x11, 0x22, 0xAA, 0xBB, 0xCC];
        assert_eq!(device_id(&mac).as_str(), "PP-AABBCC");
    }

    #[test]
    fn hostname_format() {
        let mac = [0x00, 0x11, 0x22, 0xAA, 0xBB, 0xCC];
        assert_eq!(hostname(&mac).as_str(), "plantpet-aabbcc");
    }

    #[test]
    fn device_id_from_sim_mac() {
        assert_eq!(device_id(&read_mac()).as_str(), "PP-EFCAFE");
    }
}
