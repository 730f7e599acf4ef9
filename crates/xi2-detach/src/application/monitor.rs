//! HierarchyMonitor: the blocking read-classify-act loop.
//!
//! # States
//!
//! ```text
//!        event arrives
//!  Idle ───────────────▶ Dispatching
//!   ▲                        │
//!   └────────────────────────┘
//!     notices emitted, detaches acknowledged
//! ```
//!
//! There is no terminal state.  [`HierarchyMonitor::run_loop`] only returns
//! when the connection to the server is lost.
//!
//! # What happens per event (for beginners)
//!
//! 1. The raw event is decoded.  Core events and generic events of other
//!    extensions are dropped without a word.
//! 2. An XI2 event that is not a hierarchy change prints `other event.`.
//! 3. A hierarchy change is classified record by record.  Each record prints
//!    one notice; a record labelled *slave added* is then detached, and the
//!    detach is acknowledged before the next record or event is looked at.
//!
//! Errors tied to a single event (a device that vanished, a rejected detach,
//! a malformed buffer) are logged and never end the loop.

use std::convert::Infallible;

use tracing::{debug, info, warn};
use xi2_core::{classify, decode_event, ActionLabel, DeviceId, HierarchyNotification, Notice, XiEvent};

use crate::application::detach::detach;
use crate::application::error::{MonitorError, StartupError};
use crate::application::negotiate::{ExtensionNegotiator, VersionCache, MIN_XI2_MAJOR};
use crate::application::server::{ExtensionVersion, InputServer, ServerError};
use crate::application::subscribe::subscribe;
use crate::logging::NOTICE_TARGET;

/// What one [`HierarchyMonitor::dispatch`] call did.
#[derive(Debug, Default, PartialEq)]
pub struct DispatchReport {
    /// Notices emitted, in order.
    pub notices: Vec<Notice>,
    /// Devices whose detach the server acknowledged, in order.
    pub detached: Vec<DeviceId>,
    /// Non-fatal errors that were logged and skipped.
    pub failures: Vec<MonitorError>,
}

impl DispatchReport {
    /// `true` if the event was ignored entirely.
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty() && self.detached.is_empty() && self.failures.is_empty()
    }
}

/// Explicit monitor context: the server handle plus everything learned
/// during [`initialize`](HierarchyMonitor::initialize).
pub struct HierarchyMonitor<S: InputServer> {
    server: S,
    negotiator: ExtensionNegotiator,
    xi_opcode: Option<u8>,
}

impl<S: InputServer> HierarchyMonitor<S> {
    /// Creates a monitor that will announce `client_version` to the server.
    pub fn new(server: S, client_version: ExtensionVersion) -> Self {
        Self {
            server,
            negotiator: ExtensionNegotiator::new(client_version),
            xi_opcode: None,
        }
    }

    /// The underlying server handle.
    pub fn server(&self) -> &S {
        &self.server
    }

    /// Major opcode of the X Input extension, once initialised.
    pub fn xi_opcode(&self) -> Option<u8> {
        self.xi_opcode
    }

    /// Cached server major version.
    pub fn version_cache(&self) -> VersionCache {
        self.negotiator.cache()
    }

    /// Checks the extension, negotiates its version and subscribes to
    /// hierarchy events.  Returns the server's major version.
    ///
    /// # Errors
    ///
    /// Every [`StartupError`] is fatal; the event loop must not be entered.
    pub fn initialize(&mut self) -> Result<u16, StartupError> {
        let opcode = self
            .server
            .query_extension()?
            .ok_or(StartupError::ExtensionUnavailable)?;
        self.xi_opcode = Some(opcode);

        let major = self.negotiator.negotiate(&self.server)?;
        if major < MIN_XI2_MAJOR {
            return Err(StartupError::UnsupportedVersion(major));
        }

        subscribe(&self.server).map_err(StartupError::Subscribe)?;
        info!("watching device hierarchy (XInput opcode {opcode}, major version {major})");
        Ok(major)
    }

    /// Blocks on events forever.
    ///
    /// # Errors
    ///
    /// Returns only with a fatal [`MonitorError`], normally
    /// [`MonitorError::Connection`].
    pub fn run_loop(&mut self) -> Result<Infallible, MonitorError> {
        loop {
            let raw = self
                .server
                .wait_for_event()
                .map_err(MonitorError::Connection)?;
            self.dispatch(raw)?;
        }
    }

    /// Processes one raw event.
    ///
    /// The buffer is consumed and released on every path.
    ///
    /// # Errors
    ///
    /// Returns only fatal errors; everything else ends up in
    /// [`DispatchReport::failures`].
    pub fn dispatch(&mut self, raw: Vec<u8>) -> Result<DispatchReport, MonitorError> {
        let opcode = self.xi_opcode.ok_or(MonitorError::NotInitialized)?;
        let mut report = DispatchReport::default();

        match decode_event(&raw, opcode) {
            Ok(None) => {}
            Ok(Some(XiEvent::HierarchyChanged(notification))) => {
                self.process_hierarchy(&notification, &mut report)?;
            }
            Ok(Some(XiEvent::Other { .. })) => emit(Notice::OtherEvent, &mut report),
            Err(e) => {
                let e = MonitorError::from(e);
                warn!("{e}");
                report.failures.push(e);
            }
        }

        Ok(report)
    }

    fn process_hierarchy(
        &self,
        notification: &HierarchyNotification,
        report: &mut DispatchReport,
    ) -> Result<(), MonitorError> {
        for (device, label) in classify(notification) {
            match self.notice_for(device, label) {
                Ok(notice) => emit(notice, report),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!("{e}");
                    report.failures.push(e);
                }
            }

            if label.triggers_detach() {
                match detach(&self.server, device) {
                    Ok(()) => report.detached.push(device),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!("{e}");
                        report.failures.push(e);
                    }
                }
            }
        }
        Ok(())
    }

    /// Builds the notice for one record.  Removed devices are not looked up.
    fn notice_for(&self, device_id: DeviceId, label: ActionLabel) -> Result<Notice, MonitorError> {
        if label.is_removal() {
            return Ok(Notice::Removed { device_id, label });
        }

        match self.server.device_name(device_id) {
            Ok(Some(name)) => Ok(Notice::Named {
                name,
                device_id,
                label,
            }),
            Ok(None) | Err(ServerError::Request { .. }) => {
                Err(MonitorError::DeviceVanished(device_id))
            }
            Err(e @ ServerError::Connection(_)) => Err(MonitorError::Connection(e)),
        }
    }
}

fn emit(notice: Notice, report: &mut DispatchReport) {
    info!(target: NOTICE_TARGET, "{notice}");
    report.notices.push(notice);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
