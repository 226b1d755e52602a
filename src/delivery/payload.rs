//! Request builders for the three remote sinks.
//!
//! | Sink        | Body                         | Success   |
//! |-------------|------------------------------|-----------|
//! | time-series | InfluxDB line protocol       | 204       |
//! | rest        | JSON row                     | 201 / 204 |
//! | alert       | `x-www-form-urlencoded` form | 200       |

use core::fmt::Write;

use serde::Serialize;

use crate::aggregator::WindowAverages;
use crate::alert::AlertTransition;
use crate::app::ports::HttpRequest;
use crate::config::{AlertEndpoint, RestEndpoint, TimeSeriesEndpoint};

/// Escape a line-protocol tag key or value (comma, space, equals sign).
fn escape_tag(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, ',' | ' ' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Round to two decimals for transmission.
fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

/// `measurement,device_id=<id> soil_pct=<f>,ldr_pct=<f>,happiness=<i>i`
pub fn line_protocol(measurement: &str, device_id: &str, avg: &WindowAverages) -> String {
    let mut line = String::with_capacity(96);
    let _ = write!(
        line,
        "{},device_id={} soil_pct={:.2},ldr_pct={:.2},happiness={}i",
        escape_tag(measurement),
        escape_tag(device_id),
        avg.soil_pct,
        avg.light_pct,
        avg.score_rounded(),
    );
    line
}

pub fn time_series_request(
    endpoint: &TimeSeriesEndpoint,
    device_id: &str,
    avg: &WindowAverages,
) -> HttpRequest {
    HttpRequest {
        url: format!(
            "{}/api/v2/write?org={}&bucket={}",
            endpoint.base_url.trim_end_matches('/'),
            urlencoding::encode(&endpoint.org),
            urlencoding::encode(&endpoint.bucket),
        ),
        content_type: "text/plain; charset=utf-8",
        headers: vec![("Authorization", format!("Token {}", endpoint.token))],
        body: line_protocol(&endpoint.measurement, device_id, avg),
    }
}

/// One telemetry row as stored by the REST sink.
#[derive(Debug, Serialize)]
struct TelemetryRow<'a> {
    device_id: &'a str,
    soil_pct: f32,
    ldr_pct: f32,
    happiness: u8,
}

pub fn rest_body(device_id: &str, avg: &WindowAverages) -> String {
    let row = TelemetryRow {
        device_id,
        soil_pct: round2(avg.soil_pct),
        ldr_pct: round2(avg.light_pct),
        happiness: avg.score_rounded(),
    };
    // A struct of plain fields always serializes.
    serde_json::to_string(&row).unwrap_or_default()
}

pub fn rest_request(endpoint: &RestEndpoint, device_id: &str, avg: &WindowAverages) -> HttpRequest {
    HttpRequest {
        url: format!(
            "{}/rest/v1/{}",
            endpoint.base_url.trim_end_matches('/'),
            endpoint.table
        ),
        content_type: "application/json",
        headers: vec![
            ("apikey", endpoint.api_key.clone()),
            ("Authorization", format!("Bearer {}", endpoint.api_key)),
            ("Prefer", "return=minimal".to_owned()),
        ],
        body: rest_body(device_id, avg),
    }
}

/// Title and message text for an alert transition.
pub fn alert_text(device_id: &str, transition: &AlertTransition) -> (String, String) {
    match transition {
        AlertTransition::Degraded(v) => (
            format!("{device_id}: plant needs attention"),
            format!(
                "Happiness dropped to {}% (soil {:.1}%, light {:.1}%)",
                v.score, v.soil_pct, v.light_pct
            ),
        ),
        AlertTransition::Recovered(v) => (
            format!("{device_id}: plant recovered"),
            format!(
                "Happiness back at {}% (soil {:.1}%, light {:.1}%)",
                v.score, v.soil_pct, v.light_pct
            ),
        ),
    }
}

pub fn alert_form(
    endpoint: &AlertEndpoint,
    title: &str,
    message: &str,
    sound: &str,
) -> String {
    format!(
        "token={}&user={}&title={}&message={}&priority=1&sound={}",
        urlencoding::encode(&endpoint.api_token),
        urlencoding::encode(&endpoint.user_key),
        urlencoding::encode(title),
        urlencoding::encode(message),
        urlencoding::encode(sound),
    )
}

pub fn alert_request(
    endpoint: &AlertEndpoint,
    device_id: &str,
    transition: &AlertTransition,
) -> HttpRequest {
    let (title, message) = alert_text(device_id, transition);
    let sound = match transition {
        AlertTransition::Degraded(_) => &endpoint.degraded_sound,
        AlertTransition::Recovered(_) => &endpoint.recovered_sound,
    };
    HttpRequest {
        url: endpoint.url.clone(),
        content_type: "application/x-www-form-urlencoded",
        headers: Vec::new(),
        body: alert_form(endpoint, &title, &message, sound),
    }
}
