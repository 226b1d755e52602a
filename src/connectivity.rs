//! Connectivity manager — bounded-retry link establishment.
//!
//! ```text
//!  DISCONNECTED ──[begin_connect]──▶ CONNECTING ──[link up]──▶ CONNECTED
//!        ▲                               │
//!        └──────[wait timed out]─────────┘
//! ```
//!
//! Every failed attempt, whether from [`connect`](ConnectivityManager::connect)
//! at boot or a single [`reconnect`](ConnectivityManager::reconnect) before
//! a delivery, is charged against one retry budget. When the budget is spent
//! the manager returns [`CommsError::RetriesExhausted`], which is terminal:
//! an unattended device with a wedged network stack is better off rebooting.
//! A successful link-up refills the budget.

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::app::ports::{ConnectivityError, ConnectivityPort, UpdatePort};
use crate::config::RetryPolicy;
use crate::error::CommsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

pub struct ConnectivityManager {
    state: LinkState,
    policy: RetryPolicy,
    /// Consecutive failed attempts since the last successful link-up.
    failed_attempts: u8,
    /// Signal strength sampled at the last link-up.
    last_rssi: Option<i8>,
}

impl ConnectivityManager {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            state: LinkState::Disconnected,
            policy,
            failed_attempts: 0,
            last_rssi: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn failed_attempts(&self) -> u8 {
        self.failed_attempts
    }

    pub fn last_rssi(&self) -> Option<i8> {
        self.last_rssi
    }

    /// Link check that also notices a silently dropped connection.
    pub fn is_connected(&mut self, link: &impl ConnectivityPort) -> bool {
        let up = link.is_connected();
        if !up && self.state == LinkState::Connected {
            warn!("Link: connection lost");
            self.state = LinkState::Disconnected;
        }
        up
    }

    /// Establish the link, retrying until the budget is spent.
    ///
    /// Idempotent when already connected.
    pub fn connect(
        &mut self,
        link: &mut impl ConnectivityPort,
        wait: &mut (impl DelayNs + UpdatePort),
    ) -> Result<(), CommsError> {
        loop {
            match self.reconnect(link, wait) {
                Ok(()) => return Ok(()),
                Err(CommsError::LinkDown) => {}
                Err(e) => return Err(e),
            }
        }
    }

    /// One association attempt with a bounded wait for link-up.
    ///
    /// `LinkDown` means this attempt failed but budget remains;
    /// `RetriesExhausted` means it does not.
    pub fn reconnect(
        &mut self,
        link: &mut impl ConnectivityPort,
        wait: &mut (impl DelayNs + UpdatePort),
    ) -> Result<(), CommsError> {
        if link.is_connected() {
            self.mark_connected(link.rssi());
            return Ok(());
        }
        if self.failed_attempts >= self.policy.max_connect_attempts {
            return Err(self.exhausted());
        }

        self.state = LinkState::Connecting;
        let attempt = self.failed_attempts + 1;
        info!(
            "Link: attempt {}/{}",
            attempt, self.policy.max_connect_attempts
        );

        match link.begin_connect() {
            Ok(()) => {
                if self.wait_for_link(&*link, wait) {
                    self.mark_connected(link.rssi());
                    return Ok(());
                }
                warn!(
                    "Link: no link-up within {} ms",
                    self.policy.link_timeout_ms
                );
            }
            Err(ConnectivityError::NoCredentials) => {
                self.state = LinkState::Disconnected;
                return Err(CommsError::NoCredentials);
            }
            Err(e) => warn!("Link: association failed: {}", e),
        }

        link.disconnect();
        self.state = LinkState::Disconnected;
        self.failed_attempts = self.failed_attempts.saturating_add(1);

        if self.failed_attempts >= self.policy.max_connect_attempts {
            Err(self.exhausted())
        } else {
            Err(CommsError::LinkDown)
        }
    }

    fn wait_for_link(
        &self,
        link: &impl ConnectivityPort,
        wait: &mut (impl DelayNs + UpdatePort),
    ) -> bool {
        let mut waited_ms = 0;
        while waited_ms < self.policy.link_timeout_ms {
            if link.is_connected() {
                return true;
            }
            wait.delay_ms(self.policy.link_poll_ms);
            wait.service_updates();
            waited_ms += self.policy.link_poll_ms;
        }
        link.is_connected()
    }

    fn mark_connected(&mut self, rssi: Option<i8>) {
        if self.state != LinkState::Connected {
            match rssi {
                Some(dbm) => info!("Link: connected ({} dBm)", dbm),
                None => info!("Link: connected"),
            }
            self.last_rssi = rssi;
        }
        self.state = LinkState::Connected;
        self.failed_attempts = 0;
    }

    fn exhausted(&self) -> CommsError {
        error!(
            "Link: retry budget of {} attempts exhausted",
            self.policy.max_connect_attempts
        );
        CommsError::RetriesExhausted {
            attempts: self.policy.max_connect_attempts,
        }
    }
}

impl core::fmt::Display for LinkState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}
