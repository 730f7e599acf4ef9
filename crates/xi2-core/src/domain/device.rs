//! Device identifiers and hierarchy-change records.
//!
//! # What is a hierarchy change? (for beginners)
//!
//! The X server keeps a directory of input devices.  Each entry has a small
//! integer id.  Master devices (one pointer + one keyboard per "seat") sit at
//! the top; physical slave devices are attached to a master, or left
//! *floating* when attached to none.
//!
//! When a device is plugged in, removed, or moved between masters, the
//! server emits one `HierarchyChanged` event.  That event carries a list of
//! per-device records, each with a set of flags saying what happened to that
//! device.  [`HierarchyNotification`] is the decoded event and
//! [`HierarchyChangeRecord`] is one entry of its list.

use std::fmt;

/// Identifier of one device (master or slave) in the server's device directory.
///
/// The server assigns ids; no uniqueness check is made here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(pub u16);

impl DeviceId {
    /// Pseudo id selecting every device, masters and slaves alike.
    pub const ALL_DEVICES: DeviceId = DeviceId(0);
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for DeviceId {
    fn from(value: u16) -> Self {
        DeviceId(value)
    }
}

/// Bit set of hierarchy-change flags, using the XI2 wire values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeFlags(pub u32);

impl ChangeFlags {
    pub const MASTER_ADDED: u32 = 1 << 0;
    pub const MASTER_REMOVED: u32 = 1 << 1;
    pub const SLAVE_ADDED: u32 = 1 << 2;
    pub const SLAVE_REMOVED: u32 = 1 << 3;
    pub const SLAVE_ATTACHED: u32 = 1 << 4;
    pub const SLAVE_DETACHED: u32 = 1 << 5;
    pub const DEVICE_ENABLED: u32 = 1 << 6;
    pub const DEVICE_DISABLED: u32 = 1 << 7;

    /// Returns `true` if any bit of `mask` is set.
    pub fn intersects(&self, mask: u32) -> bool {
        self.0 & mask != 0
    }
}

impl std::ops::BitOr for ChangeFlags {
    type Output = ChangeFlags;

    fn bitor(self, rhs: ChangeFlags) -> ChangeFlags {
        ChangeFlags(self.0 | rhs.0)
    }
}

/// One entry of a hierarchy-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyChangeRecord {
    /// The device this record describes.
    pub device_id: DeviceId,
    /// The master this device is attached to (or paired with, for masters).
    /// `0` for a floating slave.
    pub attachment: DeviceId,
    /// What happened to the device.
    pub flags: ChangeFlags,
}

impl HierarchyChangeRecord {
    /// Creates a record with no attachment, which is all the classifier looks at.
    pub fn new(device_id: impl Into<DeviceId>, flags: u32) -> Self {
        Self {
            device_id: device_id.into(),
            attachment: DeviceId(0),
            flags: ChangeFlags(flags),
        }
    }
}

/// A decoded `HierarchyChanged` event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HierarchyNotification {
    /// Device id carried in the event header (normally [`DeviceId::ALL_DEVICES`]).
    pub device_id: DeviceId,
    /// Server timestamp in milliseconds.
    pub time: u32,
    /// Union of the flags of every record.
    pub flags: ChangeFlags,
    /// Per-device records in server order.
    pub records: Vec<HierarchyChangeRecord>,
}

impl Default for DeviceId {
    fn default() -> Self {
        DeviceId::ALL_DEVICES
    }
}

impl HierarchyNotification {
    /// Builds a notification from its records, deriving the summary flags.
    pub fn from_records(records: Vec<HierarchyChangeRecord>) -> Self {
        let flags = records
            .iter()
            .fold(ChangeFlags::default(), |acc, r| acc | r.flags);
        Self {
            device_id: DeviceId::ALL_DEVICES,
            time: 0,
            flags,
            records,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_displays_as_plain_integer() {
        assert_eq!(DeviceId(7).to_string(), "7");
    }

    #[test]
    fn test_from_records_derives_union_of_flags() {
        // Arrange
        let records = vec![
            HierarchyChangeRecord::new(9u16, ChangeFlags::SLAVE_ADDED),
            HierarchyChangeRecord::new(2u16, ChangeFlags::SLAVE_ATTACHED),
        ];

        // Act
        let n = HierarchyNotification::from_records(records);

        // Assert
        assert_eq!(
            n.flags,
            ChangeFlags(ChangeFlags::SLAVE_ADDED | ChangeFlags::SLAVE_ATTACHED)
        );
        assert_eq!(n.records.len(), 2);
        assert_eq!(n.device_id, DeviceId::ALL_DEVICES);
    }
}
