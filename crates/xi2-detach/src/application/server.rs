//! The port through which the monitor talks to the X server.
//!
//! The application layer never touches an X connection directly.  It calls
//! the methods of [`InputServer`], which the infrastructure layer implements
//! with `x11rb` (and, for tests, with an in-memory recording server).
//!
//! Every method that changes server state returns only once the server has
//! processed the request, so callers can rely on strict request ordering.

use serde::Deserialize;
use thiserror::Error;
use xi2_core::{DeviceId, EventMask};

/// Error type for a single server round-trip.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServerError {
    /// The connection is gone; nothing further can be sent or received.
    #[error("connection to X server lost: {0}")]
    Connection(String),

    /// The server answered the request with an X error.
    #[error("{request} failed: {reason}")]
    Request {
        request: &'static str,
        reason: String,
    },
}

/// An XInput protocol version.
///
/// Missing fields in a config file fall back to [`ExtensionVersion::CLIENT_DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtensionVersion {
    pub major: u16,
    pub minor: u16,
}

impl ExtensionVersion {
    /// The version this client announces unless configured otherwise.
    pub const CLIENT_DEFAULT: ExtensionVersion = ExtensionVersion { major: 2, minor: 3 };
}

impl Default for ExtensionVersion {
    fn default() -> Self {
        Self::CLIENT_DEFAULT
    }
}

/// Server-side operations the monitor needs.
#[cfg_attr(test, mockall::automock)]
pub trait InputServer {
    /// Checks that the X Input extension is present.
    ///
    /// Returns its major opcode, which tags every XI2 generic event, or
    /// `None` if the extension is missing.
    fn query_extension(&self) -> Result<Option<u8>, ServerError>;

    /// Reads the extension version descriptor (`GetExtensionVersion`).
    ///
    /// `None` when the server reports the extension as not present.
    fn extension_version(&self) -> Result<Option<ExtensionVersion>, ServerError>;

    /// Announces the client's supported XI2 version (`XIQueryVersion`) and
    /// returns the version the server agreed to.
    fn announce_version(&self, client: ExtensionVersion) -> Result<ExtensionVersion, ServerError>;

    /// Selects `mask` on the root window and waits until it is applied.
    fn select_events(&self, mask: EventMask) -> Result<(), ServerError>;

    /// Looks up a device's name.  `None` if the device no longer exists.
    fn device_name(&self, device: DeviceId) -> Result<Option<String>, ServerError>;

    /// Detaches slave `device` from its master and waits until the server
    /// has processed the request.
    fn detach_slave(&self, device: DeviceId) -> Result<(), ServerError>;

    /// Blocks until the next event arrives and returns its raw bytes.
    fn wait_for_event(&self) -> Result<Vec<u8>, ServerError>;
}
