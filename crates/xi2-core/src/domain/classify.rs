//! The hierarchy-change classifier.
//!
//! Turns one [`HierarchyNotification`] into the sequence of
//! `(DeviceId, ActionLabel)` pairs the monitor reports and acts on.  Records
//! without any recognised flag (for example a pure enable/disable) are
//! dropped.  Server order is preserved.

use crate::domain::action::ActionLabel;
use crate::domain::device::{DeviceId, HierarchyNotification};

/// Classifies every record of `notification`.
///
/// The returned iterator borrows the notification and yields at most one
/// label per record, chosen by [`ActionLabel::from_flags`].
///
/// # Examples
///
/// ```rust
/// use xi2_core::{classify, ActionLabel, ChangeFlags, DeviceId, HierarchyChangeRecord, HierarchyNotification};
///
/// let n = HierarchyNotification::from_records(vec![
///     HierarchyChangeRecord::new(7u16, ChangeFlags::SLAVE_ADDED),
///     HierarchyChangeRecord::new(8u16, ChangeFlags::DEVICE_ENABLED),
/// ]);
/// let out: Vec<_> = classify(&n).collect();
/// assert_eq!(out, vec![(DeviceId(7), ActionLabel::SlaveAdded)]);
/// ```
pub fn classify(
    notification: &HierarchyNotification,
) -> impl Iterator<Item = (DeviceId, ActionLabel)> + '_ {
    notification.records.iter().filter_map(|record| {
        ActionLabel::from_flags(record.flags).map(|label| (record.device_id, label))
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::{ChangeFlags, HierarchyChangeRecord};

    #[test]
    fn test_classify_preserves_server_order() {
        // Arrange
        let n = HierarchyNotification::from_records(vec![
            HierarchyChangeRecord::new(12u16, ChangeFlags::SLAVE_REMOVED),
            HierarchyChangeRecord::new(4u16, ChangeFlags::MASTER_ADDED),
            HierarchyChangeRecord::new(13u16, ChangeFlags::SLAVE_ATTACHED),
        ]);

        // Act
        let out: Vec<_> = classify(&n).collect();

        // Assert
        assert_eq!(
            out,
            vec![
                (DeviceId(12), ActionLabel::SlaveRemoved),
                (DeviceId(4), ActionLabel::MasterAdded),
                (DeviceId(13), ActionLabel::SlaveAttached),
            ]
        );
    }

    #[test]
    fn test_classify_emits_one_label_for_multi_flag_record() {
        // Arrange – a new slave is reported as added and attached at once
        let n = HierarchyNotification::from_records(vec![HierarchyChangeRecord::new(
            15u16,
            ChangeFlags::SLAVE_ADDED | ChangeFlags::SLAVE_ATTACHED | ChangeFlags::DEVICE_ENABLED,
        )]);

        // Act
        let out: Vec<_> = classify(&n).collect();

        // Assert
        assert_eq!(out, vec![(DeviceId(15), ActionLabel::SlaveAdded)]);
    }

    #[test]
    fn test_classify_skips_unrecognised_records() {
        let n = HierarchyNotification::from_records(vec![
            HierarchyChangeRecord::new(5u16, ChangeFlags::DEVICE_DISABLED),
            HierarchyChangeRecord::new(6u16, 0),
        ]);

        assert_eq!(classify(&n).count(), 0);
    }

    #[test]
    fn test_classify_empty_notification_yields_nothing() {
        let n = HierarchyNotification::default();
        assert!(classify(&n).next().is_none());
    }
}
