//! Network adapter — the station link and the HTTPS client behind one value.
//!
//! Delivery needs both ports at once (check the link, then POST), so the
//! application service takes a single `impl ConnectivityPort + HttpPort`.
//! This adapter pairs the two concrete adapters and forwards each call.

use crate::adapters::http::HttpAdapter;
use crate::adapters::wifi::WifiAdapter;
use crate::app::ports::{
    ConnectivityError, ConnectivityPort, HttpPort, HttpRequest, HttpResponse, TransportError,
};

pub struct NetworkAdapter {
    wifi: WifiAdapter,
    http: HttpAdapter,
}

impl NetworkAdapter {
    pub fn new(wifi: WifiAdapter, http: HttpAdapter) -> Self {
        Self { wifi, http }
    }
}

// ── ConnectivityPort implementation ───────────────────────────

impl ConnectivityPort for NetworkAdapter {
    fn begin_connect(&mut self) -> Result<(), ConnectivityError> {
        self.wifi.begin_connect()
    }

    fn disconnect(&mut self) {
        self.wifi.disconnect();
    }

    fn is_connected(&self) -> bool {
        self.wifi.is_connected()
    }

    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        self.wifi.set_credentials(ssid, password)
    }

    fn rssi(&self) -> Option<i8> {
        self.wifi.rssi()
    }
}

// ── HttpPort implementation ───────────────────────────────────

impl HttpPort for NetworkAdapter {
    fn post(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.http.post(request)
    }
}
