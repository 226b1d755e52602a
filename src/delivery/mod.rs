//! Delivery policy — per-destination HTTP delivery.
//!
//! Each call to [`DeliveryPolicy::deliver`] is independent:
//!
//! 1. Link down → one [`reconnect`](ConnectivityManager::reconnect). If that
//!    fails the delivery is skipped; no retry loop runs inside a send.
//! 2. Link up → POST once. The status is judged against the sink's own
//!    accepted set; anything else is logged with the response body and
//!    reported, never retried.
//! 3. Whatever the POST returned, updates are serviced (and the watchdog
//!    fed) before the next step, so back-to-back slow sinks never add up
//!    to a watchdog reset.
//!
//! Only an exhausted retry budget surfaces as `Err`, and in that case no
//! request is issued.

pub mod payload;

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::{ConnectivityPort, HttpPort, HttpRequest, TransportError, UpdatePort};
use crate::connectivity::ConnectivityManager;
use crate::error::{CommsError, Result};

/// Longest response body kept for the log.
const MAX_LOGGED_BODY: usize = 200;

/// The three remote destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// InfluxDB line-protocol write.
    TimeSeries,
    /// REST table insert.
    Rest,
    /// Push notification.
    Alert,
}

impl Sink {
    /// Status codes this destination answers a successful write with.
    pub fn accepted_statuses(self) -> &'static [u16] {
        match self {
            Self::TimeSeries => &[204],
            Self::Rest => &[201, 204],
            Self::Alert => &[200],
        }
    }

    pub fn accepts(self, status: u16) -> bool {
        self.accepted_statuses().contains(&status)
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeSeries => write!(f, "time-series"),
            Self::Rest => write!(f, "rest"),
            Self::Alert => write!(f, "alert"),
        }
    }
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { status: u16 },
    HttpError { status: u16, body: String },
    TransportError(TransportError),
    SkippedNoLink,
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered { status } => write!(f, "delivered ({status})"),
            Self::HttpError { status, .. } => write!(f, "HTTP {status}"),
            Self::TransportError(e) => write!(f, "transport: {e}"),
            Self::SkippedNoLink => write!(f, "skipped, no link"),
        }
    }
}

/// Stateless policy; all mutable state lives in the manager and adapters.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeliveryPolicy;

impl DeliveryPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn deliver<N, W>(
        &self,
        sink: Sink,
        request: &HttpRequest,
        link: &mut ConnectivityManager,
        net: &mut N,
        wait: &mut W,
    ) -> Result<DeliveryOutcome>
    where
        N: ConnectivityPort + HttpPort,
        W: DelayNs + UpdatePort,
    {
        if !link.is_connected(&*net) {
            match link.reconnect(net, wait) {
                Ok(()) => {}
                Err(e @ CommsError::RetriesExhausted { .. }) => return Err(e.into()),
                Err(e) => {
                    warn!("Deliver[{}]: skipped: {}", sink, e);
                    return Ok(DeliveryOutcome::SkippedNoLink);
                }
            }
        }

        let response = net.post(request);
        wait.service_updates();

        let outcome = match response {
            Ok(resp) if sink.accepts(resp.status) => DeliveryOutcome::Delivered {
                status: resp.status,
            },
            Ok(resp) => {
                let body = truncate(&resp.body, MAX_LOGGED_BODY);
                warn!(
                    "Deliver[{}]: HTTP {} from {}: {}",
                    sink, resp.status, request.url, body
                );
                DeliveryOutcome::HttpError {
                    status: resp.status,
                    body: body.to_owned(),
                }
            }
            Err(e) => {
                warn!("Deliver[{}]: transport error: {}", sink, e);
                DeliveryOutcome::TransportError(e)
            }
        };

        if let DeliveryOutcome::Delivered { status } = outcome {
            info!("Deliver[{}]: ok ({})", sink, status);
        }
        Ok(outcome)
    }
}

/// Cut `s` to at most `max` bytes on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
