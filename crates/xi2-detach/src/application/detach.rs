//! DetachActuator: floats one slave device.
//!
//! Sends a single `XIChangeHierarchy` request carrying one `DetachSlave`
//! change and waits for the server to process it.  An acknowledged request
//! means the server has handled it, which for a device that vanished in the
//! meantime is an X error, reported here as
//! [`MonitorError::DetachRejected`].

use tracing::debug;
use xi2_core::DeviceId;

use crate::application::error::MonitorError;
use crate::application::server::{InputServer, ServerError};

/// Detaches `device` from its master.
///
/// # Errors
///
/// - [`MonitorError::DetachRejected`] if the server answers with an X error.
/// - [`MonitorError::Connection`] if the connection is lost.
pub fn detach<S: InputServer + ?Sized>(server: &S, device: DeviceId) -> Result<(), MonitorError> {
    match server.detach_slave(device) {
        Ok(()) => {
            debug!("detach of device {device} acknowledged");
            Ok(())
        }
        Err(ServerError::Request { reason, .. }) => {
            Err(MonitorError::DetachRejected { device, reason })
        }
        Err(e @ ServerError::Connection(_)) => Err(MonitorError::Connection(e)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
