//! In-memory X server for integration testing.
//!
//! # Why a recording server?
//!
//! The real [`X11InputServer`](super::x11::X11InputServer) needs a running X
//! server, and detaching devices on the test machine would disturb the
//! session running the tests.
//!
//! `RecordingInputServer` answers every [`InputServer`] call from fixed
//! tables, replays a scripted queue of raw events, and pushes each call into
//! a `Mutex<Vec<ServerCall>>` so test assertions can inspect exactly which
//! requests were made and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let server = RecordingInputServer::xi2(131)
//!     .with_device(7, "Logitech USB Receiver")
//!     .with_event(raw_hierarchy_event);
//! let mut monitor = HierarchyMonitor::new(server, ExtensionVersion::CLIENT_DEFAULT);
//! monitor.initialize().unwrap();
//! let _ = monitor.run_loop(); // returns once the script is exhausted
//!
//! assert_eq!(monitor.server().detached(), vec![DeviceId(7)]);
//! ```
//!
//! When the event queue runs dry, `wait_for_event` reports a lost
//! connection, which is how `run_loop` terminates in tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use xi2_core::{DeviceId, EventMask};

use crate::application::server::{ExtensionVersion, InputServer, ServerError};

/// One request received by the [`RecordingInputServer`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServerCall {
    QueryExtension,
    ExtensionVersion,
    AnnounceVersion(ExtensionVersion),
    SelectEvents(EventMask),
    DeviceName(DeviceId),
    DetachSlave(DeviceId),
    WaitForEvent,
}

/// A scripted server that records every call.
#[derive(Default)]
pub struct RecordingInputServer {
    /// XInput major opcode; `None` simulates a server without the extension.
    pub xi_opcode: Option<u8>,
    /// Version descriptor; `None` simulates a missing descriptor.
    pub version: Option<ExtensionVersion>,
    /// Device directory used for name lookups.
    pub devices: HashMap<DeviceId, String>,
    /// Devices whose detach the server answers with an X error.
    pub rejected: HashSet<DeviceId>,
    /// Raw events returned by `wait_for_event`, front first.
    pub events: Mutex<VecDeque<Vec<u8>>>,
    /// Every call, in order.
    pub calls: Mutex<Vec<ServerCall>>,
}

impl RecordingInputServer {
    /// A server offering XI 2.4 on `xi_opcode`.
    pub fn xi2(xi_opcode: u8) -> Self {
        Self {
            xi_opcode: Some(xi_opcode),
            version: Some(ExtensionVersion { major: 2, minor: 4 }),
            ..Self::default()
        }
    }

    /// Adds a named device to the directory.
    pub fn with_device(mut self, id: u16, name: &str) -> Self {
        self.devices.insert(DeviceId(id), name.to_string());
        self
    }

    /// Makes detach requests for `id` fail with an X error.
    pub fn rejecting(mut self, id: u16) -> Self {
        self.rejected.insert(DeviceId(id));
        self
    }

    /// Appends a raw event to the script.
    pub fn with_event(self, raw: Vec<u8>) -> Self {
        self.events.lock().unwrap().push_back(raw);
        self
    }

    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<ServerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Devices a detach was requested for, in order (acknowledged or not).
    pub fn detached(&self) -> Vec<DeviceId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ServerCall::DetachSlave(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ServerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl InputServer for RecordingInputServer {
    fn query_extension(&self) -> Result<Option<u8>, ServerError> {
        self.record(ServerCall::QueryExtension);
        Ok(self.xi_opcode)
    }

    fn extension_version(&self) -> Result<Option<ExtensionVersion>, ServerError> {
        self.record(ServerCall::ExtensionVersion);
        Ok(self.version)
    }

    /// Agrees to the lower of the client's and the server's version.
    fn announce_version(&self, client: ExtensionVersion) -> Result<ExtensionVersion, ServerError> {
        self.record(ServerCall::AnnounceVersion(client));
        let server = self.version.unwrap_or(client);
        let agreed = if (server.major, server.minor) < (client.major, client.minor) {
            server
        } else {
            client
        };
        Ok(agreed)
    }

    fn select_events(&self, mask: EventMask) -> Result<(), ServerError> {
        self.record(ServerCall::SelectEvents(mask));
        Ok(())
    }

    fn device_name(&self, device: DeviceId) -> Result<Option<String>, ServerError> {
        self.record(ServerCall::DeviceName(device));
        Ok(self.devices.get(&device).cloned())
    }

    fn detach_slave(&self, device: DeviceId) -> Result<(), ServerError> {
        self.record(ServerCall::DetachSlave(device));
        if self.rejected.contains(&device) {
            return Err(ServerError::Request {
                request: "XIChangeHierarchy",
                reason: "Device".to_string(),
            });
        }
        Ok(())
    }

    fn wait_for_event(&self) -> Result<Vec<u8>, ServerError> {
        self.record(ServerCall::WaitForEvent);
        self.events
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ServerError::Connection("event script exhausted".to_string()))
    }
}
