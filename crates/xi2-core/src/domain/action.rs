//! Action labels and the notices printed for them.

use std::fmt;

use crate::domain::device::{ChangeFlags, DeviceId};

/// What happened to one device, as reported to the user.
///
/// The variants are declared in classification priority order: when a record
/// carries several flags, the earliest matching variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionLabel {
    MasterAdded,
    MasterRemoved,
    SlaveAdded,
    SlaveRemoved,
    SlaveAttached,
    SlaveDetached,
}

impl ActionLabel {
    /// Labels paired with their flag bit, highest priority first.
    pub const PRIORITY: [(ActionLabel, u32); 6] = [
        (ActionLabel::MasterAdded, ChangeFlags::MASTER_ADDED),
        (ActionLabel::MasterRemoved, ChangeFlags::MASTER_REMOVED),
        (ActionLabel::SlaveAdded, ChangeFlags::SLAVE_ADDED),
        (ActionLabel::SlaveRemoved, ChangeFlags::SLAVE_REMOVED),
        (ActionLabel::SlaveAttached, ChangeFlags::SLAVE_ATTACHED),
        (ActionLabel::SlaveDetached, ChangeFlags::SLAVE_DETACHED),
    ];

    /// Picks the highest-priority label whose flag is set, if any.
    pub fn from_flags(flags: ChangeFlags) -> Option<ActionLabel> {
        Self::PRIORITY
            .iter()
            .find(|(_, bit)| flags.intersects(*bit))
            .map(|(label, _)| *label)
    }

    /// Lower-case text used in notices.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionLabel::MasterAdded => "master added",
            ActionLabel::MasterRemoved => "master removed",
            ActionLabel::SlaveAdded => "slave added",
            ActionLabel::SlaveRemoved => "slave removed",
            ActionLabel::SlaveAttached => "slave attached",
            ActionLabel::SlaveDetached => "slave detached",
        }
    }

    /// `true` when the device is already gone from the directory and must
    /// not be looked up.
    pub fn is_removal(&self) -> bool {
        matches!(self, ActionLabel::MasterRemoved | ActionLabel::SlaveRemoved)
    }

    /// `true` for the one label the detach-on-attach policy reacts to.
    ///
    /// `SlaveAttached` is deliberately excluded: detaching produces a
    /// `SlaveDetached` record and re-attachments are left alone, so the
    /// monitor never reacts to its own requests.
    pub fn triggers_detach(&self) -> bool {
        matches!(self, ActionLabel::SlaveAdded)
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of monitor output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A device that could be looked up: `"<name> (<id>) <label>."`.
    Named {
        name: String,
        device_id: DeviceId,
        label: ActionLabel,
    },
    /// A removed device, reported by id only: `"<id> <label>."`.
    Removed {
        device_id: DeviceId,
        label: ActionLabel,
    },
    /// An XI2 event that is not a hierarchy change.
    OtherEvent,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Named {
                name,
                device_id,
                label,
            } => write!(f, "{name} ({device_id}) {label}."),
            Notice::Removed { device_id, label } => write!(f, "{device_id} {label}."),
            Notice::OtherEvent => f.write_str("other event."),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
