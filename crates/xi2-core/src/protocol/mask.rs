//! The event mask the monitor subscribes with.
//!
//! # What is an XI2 event mask? (for beginners)
//!
//! A client tells the server which XI2 events it wants by sending, per
//! window, a list of `(device, bitmask)` pairs.  Bit `n` of the mask selects
//! event type `n`.  The device may be a real id or a pseudo id such as
//! [`DeviceId::ALL_DEVICES`].
//!
//! Hierarchy events are only ever delivered to the root window, and only
//! when selected for `ALL_DEVICES`, so the monitor's mask is fixed.

use crate::domain::device::DeviceId;
use crate::protocol::codec::{XI_DEVICE_CHANGED, XI_HIERARCHY_CHANGED};

/// A single `(device, bitmask)` selection.  Never mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMask {
    device_id: DeviceId,
    bits: u32,
}

impl EventMask {
    /// The monitor's subscription: device-changed and hierarchy-changed for
    /// every device.
    pub const fn hierarchy_watch() -> Self {
        Self {
            device_id: DeviceId::ALL_DEVICES,
            bits: (1 << XI_DEVICE_CHANGED) | (1 << XI_HIERARCHY_CHANGED),
        }
    }

    /// The device (or pseudo device) the mask applies to.
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// The mask as one wire word.
    pub fn bits(&self) -> u32 {
        self.bits
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
