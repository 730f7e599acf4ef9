//! Error types of the monitor's two phases.
//!
//! [`StartupError`] is always fatal: the process reports it and exits with a
//! failure status.  [`MonitorError`] is raised while events are processed;
//! only [`MonitorError::is_fatal`] variants leave the loop, the rest are
//! logged and the next event is read as usual.

use thiserror::Error;
use xi2_core::{DecodeError, DeviceId};

use crate::application::server::ServerError;

/// Errors that prevent the monitor from entering its event loop.
#[derive(Debug, Error, PartialEq)]
pub enum StartupError {
    #[error("Unable to connect to X server: {0}")]
    ConnectionUnavailable(String),

    #[error("X Input extension not available.")]
    ExtensionUnavailable,

    /// The extension is listed but its version descriptor is missing.
    #[error("extension not available.")]
    VersionUnavailable,

    #[error("X Input extension {0}.x does not support XI2 hierarchy events")]
    UnsupportedVersion(u16),

    #[error("failed to subscribe to hierarchy events: {0}")]
    Subscribe(#[source] ServerError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Errors raised while processing one event.
#[derive(Debug, Error, PartialEq)]
pub enum MonitorError {
    #[error("monitor used before initialize()")]
    NotInitialized,

    /// The device disappeared between the hierarchy event and the name lookup.
    #[error("device {0} vanished before it could be looked up")]
    DeviceVanished(DeviceId),

    #[error("server rejected detach of device {device}: {reason}")]
    DetachRejected { device: DeviceId, reason: String },

    #[error("dropping malformed XI2 event: {0}")]
    Malformed(#[from] DecodeError),

    #[error(transparent)]
    Connection(ServerError),
}

impl MonitorError {
    /// `true` if the event loop cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MonitorError::NotInitialized | MonitorError::Connection(_))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
