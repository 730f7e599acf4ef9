//! X11 implementation of [`InputServer`] on top of `x11rb`.
//!
//! # Request mapping
//!
//! | `InputServer` method   | X request                               |
//! |------------------------|-----------------------------------------|
//! | `query_extension`      | `QueryExtension("XInputExtension")`     |
//! | `extension_version`    | XI `GetExtensionVersion`                |
//! | `announce_version`     | `XIQueryVersion`                        |
//! | `select_events`        | `XISelectEvents` on the root window     |
//! | `device_name`          | `XIQueryDevice`                         |
//! | `detach_slave`         | `XIChangeHierarchy` with one `DetachSlave` |
//!
//! Requests without a reply are sent checked: `check()` makes a round-trip
//! and returns the request's X error if there was one, so the call returns
//! only after the server has processed the request.
//!
//! # Display selection
//!
//! `x11rb::connect(None)` reads the `DISPLAY` environment variable.  A
//! display name from the command line or the config file takes precedence.

use tracing::debug;
use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError};
use x11rb::protocol::xinput::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{ConnectionExt as _, Window};
use x11rb::rust_connection::RustConnection;
use xi2_core::{DeviceId, EventMask};

use crate::application::error::StartupError;
use crate::application::server::{ExtensionVersion, InputServer, ServerError};

/// A connection to the X server plus the root window of its default screen.
pub struct X11InputServer {
    conn: RustConnection,
    root: Window,
}

impl X11InputServer {
    /// Connects to `display`, or to `$DISPLAY` when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::ConnectionUnavailable`] if the display cannot
    /// be opened.
    pub fn connect(display: Option<&str>) -> Result<Self, StartupError> {
        let (conn, screen_num) = x11rb::connect(display)
            .map_err(|e| StartupError::ConnectionUnavailable(e.to_string()))?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| {
                StartupError::ConnectionUnavailable(format!("screen {screen_num} does not exist"))
            })?;
        debug!("connected to X server, screen {screen_num}, root window {root:#x}");
        Ok(Self { conn, root })
    }
}

/// One `DetachSlave` hierarchy change.  `len` counts 4-byte units of the
/// whole change: type, len, deviceid and two bytes of padding.
fn detach_change(device: DeviceId) -> xinput::HierarchyChange {
    xinput::HierarchyChange {
        len: 2,
        data: xinput::HierarchyChangeData::DetachSlave(xinput::HierarchyChangeDataDetachSlave {
            deviceid: device.0,
        }),
    }
}

fn connection_lost(e: ConnectionError) -> ServerError {
    ServerError::Connection(e.to_string())
}

fn request_failed(request: &'static str, e: ReplyError) -> ServerError {
    match e {
        ReplyError::ConnectionError(e) => connection_lost(e),
        ReplyError::X11Error(x) => ServerError::Request {
            request,
            reason: format!("{:?}", x.error_kind),
        },
    }
}

impl InputServer for X11InputServer {
    fn query_extension(&self) -> Result<Option<u8>, ServerError> {
        let reply = self
            .conn
            .query_extension(xinput::X11_EXTENSION_NAME.as_bytes())
            .map_err(connection_lost)?
            .reply()
            .map_err(|e| request_failed("QueryExtension", e))?;
        Ok(reply.present.then_some(reply.major_opcode))
    }

    fn extension_version(&self) -> Result<Option<ExtensionVersion>, ServerError> {
        let reply = self
            .conn
            .xinput_get_extension_version(xinput::X11_EXTENSION_NAME.as_bytes())
            .map_err(connection_lost)?
            .reply()
            .map_err(|e| request_failed("GetExtensionVersion", e))?;
        Ok(reply.present.then_some(ExtensionVersion {
            major: reply.server_major,
            minor: reply.server_minor,
        }))
    }

    fn announce_version(&self, client: ExtensionVersion) -> Result<ExtensionVersion, ServerError> {
        let reply = self
            .conn
            .xinput_xi_query_version(client.major, client.minor)
            .map_err(connection_lost)?
            .reply()
            .map_err(|e| request_failed("XIQueryVersion", e))?;
        Ok(ExtensionVersion {
            major: reply.major_version,
            minor: reply.minor_version,
        })
    }

    fn select_events(&self, mask: EventMask) -> Result<(), ServerError> {
        let selection = xinput::EventMask {
            deviceid: mask.device_id().0,
            mask: vec![xinput::XIEventMask::from(mask.bits())],
        };
        self.conn
            .xinput_xi_select_events(self.root, std::slice::from_ref(&selection))
            .map_err(connection_lost)?
            .check()
            .map_err(|e| request_failed("XISelectEvents", e))
    }

    fn device_name(&self, device: DeviceId) -> Result<Option<String>, ServerError> {
        let cookie = self
            .conn
            .xinput_xi_query_device(device.0)
            .map_err(connection_lost)?;
        match cookie.reply() {
            Ok(reply) => Ok(reply
                .infos
                .into_iter()
                .next()
                .map(|info| String::from_utf8_lossy(&info.name).into_owned())),
            // BadDevice: the id is no longer in the directory.
            Err(ReplyError::X11Error(_)) => Ok(None),
            Err(ReplyError::ConnectionError(e)) => Err(connection_lost(e)),
        }
    }

    fn detach_slave(&self, device: DeviceId) -> Result<(), ServerError> {
        let change = detach_change(device);
        self.conn
            .xinput_xi_change_hierarchy(std::slice::from_ref(&change))
            .map_err(connection_lost)?
            .check()
            .map_err(|e| request_failed("XIChangeHierarchy", e))
    }

    fn wait_for_event(&self) -> Result<Vec<u8>, ServerError> {
        self.conn.wait_for_raw_event().map_err(connection_lost)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
