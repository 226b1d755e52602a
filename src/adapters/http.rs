//! HTTPS client adapter.
//!
//! Implements [`HttpPort`] with one blocking POST per call. A fresh
//! connection is opened for every request: deliveries happen at most a
//! few times per window, so keeping TLS sessions alive buys nothing.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` wrapped in the
//!   `embedded_svc` HTTP client, server certificates checked against the
//!   ESP-IDF certificate bundle.
//! - **all other targets**: simulation that records requests and answers
//!   with each sink's success status unless told otherwise.

use log::debug;

use crate::app::ports::{HttpPort, HttpRequest, HttpResponse, TransportError};

/// Longest response body read back (enough for any error message).
#[cfg(target_os = "espidf")]
const MAX_RESPONSE_BODY: usize = 512;

/// Per-request bound. Delivery feeds the watchdog after every POST, so one
/// request (connect plus timeout) must fit inside the watchdog budget.
#[cfg(target_os = "espidf")]
const REQUEST_TIMEOUT: core::time::Duration = core::time::Duration::from_secs(10);

#[cfg(target_os = "espidf")]
const _: () = assert!(
    2 * REQUEST_TIMEOUT.as_millis() < crate::drivers::watchdog::WATCHDOG_TIMEOUT_MS as u128
);

pub struct HttpAdapter {
    #[cfg(not(target_os = "espidf"))]
    sent: Vec<HttpRequest>,
    #[cfg(not(target_os = "espidf"))]
    scripted: std::collections::VecDeque<Result<u16, TransportError>>,
}

impl Default for HttpAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            sent: Vec::new(),
            #[cfg(not(target_os = "espidf"))]
            scripted: std::collections::VecDeque::new(),
        }
    }

    /// Simulation: answer the next request with `result` instead of the
    /// default success status.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_script(&mut self, result: Result<u16, TransportError>) {
        self.scripted.push_back(result);
    }

    /// Simulation: every request posted so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_sent(&self) -> &[HttpRequest] {
        &self.sent
    }

    #[cfg(target_os = "espidf")]
    fn platform_post(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        use embedded_svc::http::client::Client;
        use embedded_svc::io::{Read, Write};
        use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
        use esp_idf_svc::io::EspIOError;

        fn classify(e: EspIOError) -> TransportError {
            if e.0.code() == esp_idf_svc::sys::ESP_ERR_TIMEOUT as i32 {
                TransportError::Timeout
            } else {
                TransportError::Io
            }
        }

        let connection = EspHttpConnection::new(&Configuration {
            timeout: Some(REQUEST_TIMEOUT),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        })
        .map_err(|e| {
            log::warn!("HTTP: connection setup failed: {}", e);
            TransportError::Connect
        })?;
        let mut client = Client::wrap(connection);

        let content_length = request.body.len().to_string();
        let mut headers: Vec<(&str, &str)> = vec![
            ("Content-Type", request.content_type),
            ("Content-Length", &content_length),
        ];
        headers.extend(request.headers.iter().map(|(k, v)| (*k, v.as_str())));

        let mut req = client
            .post(&request.url, &headers)
            .map_err(|_| TransportError::Connect)?;
        req.write_all(request.body.as_bytes()).map_err(classify)?;
        req.flush().map_err(classify)?;
        let mut response = req.submit().map_err(classify)?;
        let status = response.status();

        let mut body = Vec::with_capacity(MAX_RESPONSE_BODY);
        let mut buf = [0u8; 128];
        while body.len() < MAX_RESPONSE_BODY {
            match response.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => body.extend_from_slice(&buf[..n.min(MAX_RESPONSE_BODY - body.len())]),
                // The status is what matters; a truncated body is fine.
                Err(_) => break,
            }
        }

        Ok(HttpResponse {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_post(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.push(request.clone());
        let status = match self.scripted.pop_front() {
            Some(scripted) => scripted?,
            None => match request.content_type {
                "application/x-www-form-urlencoded" => 200,
                "application/json" => 201,
                _ => 204,
            },
        };
        Ok(HttpResponse {
            status,
            body: if status >= 400 {
                "{\"message\":\"simulated failure\"}".to_owned()
            } else {
                String::new()
            },
        })
    }
}

impl HttpPort for HttpAdapter {
    fn post(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(
            "HTTP: POST {} ({} bytes, {})",
            request.url,
            request.body.len(),
            request.content_type
        );
        self.platform_post(request)
    }
}
