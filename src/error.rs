//! Unified error types for the PlantPet firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! main loop's error handling uniform. All variants are `Copy`.
//!
//! Only one class of error is fatal: an exhausted connectivity retry budget.
//! The binary answers it with a full restart; everything else is logged and
//! the loop carries on.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The network link could not be (re-)established.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl Error {
    /// True if the only sane recovery is a full restart.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Comms(CommsError::RetriesExhausted { .. }))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// No WiFi credentials configured; retrying cannot help.
    NoCredentials,
    /// Link did not come up within the bounded wait.
    LinkDown,
    /// The association retry budget is spent. Terminal.
    RetriesExhausted { attempts: u8 },
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials"),
            Self::LinkDown => write!(f, "WiFi link down"),
            Self::RetriesExhausted { attempts } => {
                write!(f, "WiFi retries exhausted after {attempts} attempts")
            }
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
