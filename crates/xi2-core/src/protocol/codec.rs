//! Decoder for raw XI2 generic events.
//!
//! Wire format of an XI2 `HierarchyChanged` event (X11 generic event):
//! ```text
//! [type:1=35][extension:1][sequence:2][length:4][evtype:2][deviceid:2]
//! [time:4][flags:4][num_info:2][pad:10]                     = 32 bytes
//! num_info × [deviceid:2][attachment:2][use:1][enabled:1][pad:2][flags:4]
//! ```
//! `length` counts the 4-byte words after the first 32 bytes.  Multi-byte
//! integers use the byte order negotiated at connection setup, which is the
//! client's native order.

use thiserror::Error;

use crate::domain::device::{ChangeFlags, DeviceId, HierarchyChangeRecord, HierarchyNotification};

/// Core-protocol event code shared by every extension's generic events.
pub const GE_GENERIC_EVENT: u8 = 35;
/// XI2 event type: a device's classes changed.
pub const XI_DEVICE_CHANGED: u16 = 1;
/// XI2 event type: the device hierarchy changed.
pub const XI_HIERARCHY_CHANGED: u16 = 11;

/// Size of every X11 event before any generic-event extension data.
pub const EVENT_HEADER_SIZE: usize = 32;
/// Size of one hierarchy info record.
pub const HIERARCHY_INFO_SIZE: usize = 12;

/// Errors that can occur while decoding an event buffer.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// The buffer is shorter than the fixed part it must contain.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The event's own length field promises more data than was read.
    #[error("event length mismatch: header says {declared} bytes, available is {available}")]
    LengthMismatch { declared: usize, available: usize },

    /// `num_info` records do not fit in the declared event length.
    #[error("hierarchy event declares {num_info} records but only {room} bytes follow the header")]
    RecordOverflow { num_info: u16, room: usize },
}

/// An XI2 generic event addressed to this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XiEvent {
    /// The device hierarchy changed.
    HierarchyChanged(HierarchyNotification),
    /// Any other XI2 event type (device changed, and so on).
    Other { evtype: u16 },
}

/// Decodes `raw` if it is a generic event of the extension with major
/// opcode `xi_opcode`.
///
/// Returns `Ok(None)` for core events and for generic events of other
/// extensions; they are not ours to handle.
///
/// # Errors
///
/// Returns [`DecodeError`] if the buffer is truncated or internally
/// inconsistent.
pub fn decode_event(raw: &[u8], xi_opcode: u8) -> Result<Option<XiEvent>, DecodeError> {
    if raw.len() < EVENT_HEADER_SIZE {
        return Err(DecodeError::InsufficientData {
            needed: EVENT_HEADER_SIZE,
            available: raw.len(),
        });
    }

    // The high bit marks events delivered through SendEvent.
    if raw[0] & 0x7F != GE_GENERIC_EVENT || raw[1] != xi_opcode {
        return Ok(None);
    }

    let evtype = read_u16(raw, 8);
    if evtype != XI_HIERARCHY_CHANGED {
        return Ok(Some(XiEvent::Other { evtype }));
    }

    let declared = EVENT_HEADER_SIZE + 4 * read_u32(raw, 4) as usize;
    if raw.len() < declared {
        return Err(DecodeError::LengthMismatch {
            declared,
            available: raw.len(),
        });
    }

    let num_info = read_u16(raw, 20);
    let room = declared - EVENT_HEADER_SIZE;
    if usize::from(num_info) * HIERARCHY_INFO_SIZE > room {
        return Err(DecodeError::RecordOverflow { num_info, room });
    }

    let records = raw[EVENT_HEADER_SIZE..]
        .chunks_exact(HIERARCHY_INFO_SIZE)
        .take(num_info.into())
        .map(|info| HierarchyChangeRecord {
            device_id: DeviceId(read_u16(info, 0)),
            attachment: DeviceId(read_u16(info, 2)),
            flags: ChangeFlags(read_u32(info, 8)),
        })
        .collect();

    Ok(Some(XiEvent::HierarchyChanged(HierarchyNotification {
        device_id: DeviceId(read_u16(raw, 10)),
        time: read_u32(raw, 12),
        flags: ChangeFlags(read_u32(raw, 16)),
        records,
    })))
}

/// Encodes `notification` as the server would send it on `xi_opcode`.
///
/// The monitor never sends events; this exists so tests, benchmarks and the
/// in-memory server can produce byte-exact input for [`decode_event`].
pub fn encode_hierarchy_event(xi_opcode: u8, notification: &HierarchyNotification) -> Vec<u8> {
    let extra = notification.records.len() * HIERARCHY_INFO_SIZE;
    let mut buf = Vec::with_capacity(EVENT_HEADER_SIZE + extra);

    buf.push(GE_GENERIC_EVENT);
    buf.push(xi_opcode);
    buf.extend_from_slice(&0u16.to_ne_bytes()); // sequence
    buf.extend_from_slice(&((extra / 4) as u32).to_ne_bytes());
    buf.extend_from_slice(&XI_HIERARCHY_CHANGED.to_ne_bytes());
    buf.extend_from_slice(&notification.device_id.0.to_ne_bytes());
    buf.extend_from_slice(&notification.time.to_ne_bytes());
    buf.extend_from_slice(&notification.flags.0.to_ne_bytes());
    buf.extend_from_slice(&(notification.records.len() as u16).to_ne_bytes());
    buf.extend_from_slice(&[0u8; 10]);

    for record in &notification.records {
        buf.extend_from_slice(&record.device_id.0.to_ne_bytes());
        buf.extend_from_slice(&record.attachment.0.to_ne_bytes());
        buf.push(0); // use
        buf.push(1); // enabled
        buf.extend_from_slice(&[0u8; 2]);
        buf.extend_from_slice(&record.flags.0.to_ne_bytes());
    }

    buf
}

/// Encodes a bare generic event header of type `evtype` on `opcode`.
pub fn encode_generic_event(opcode: u8, evtype: u16) -> Vec<u8> {
    let mut buf = vec![0u8; EVENT_HEADER_SIZE];
    buf[0] = GE_GENERIC_EVENT;
    buf[1] = opcode;
    buf[8..10].copy_from_slice(&evtype.to_ne_bytes());
    buf
}

fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_ne_bytes([buf[at], buf[at + 1]])
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_ne_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const XI_OPCODE: u8 = 131;

    fn slave_added(id: u16) -> HierarchyNotification {
        HierarchyNotification::from_records(vec![HierarchyChangeRecord {
            device_id: DeviceId(id),
            attachment: DeviceId(2),
            flags: ChangeFlags(ChangeFlags::SLAVE_ADDED | ChangeFlags::SLAVE_ATTACHED),
        }])
    }

    #[test]
    fn test_decode_hierarchy_event_yields_records_in_order() {
        // Arrange
        let n = HierarchyNotification::from_records(vec![
            HierarchyChangeRecord::new(3u16, ChangeFlags::SLAVE_REMOVED),
            HierarchyChangeRecord::new(7u16, ChangeFlags::SLAVE_ADDED),
        ]);
        let raw = encode_hierarchy_event(XI_OPCODE, &n);

        // Act
        let decoded = decode_event(&raw, XI_OPCODE).unwrap();

        // Assert
        assert_eq!(decoded, Some(XiEvent::HierarchyChanged(n)));
    }

    #[test]
    fn test_decode_keeps_attachment_and_header_fields() {
        let mut n = slave_added(9);
        n.time = 0xDEAD_BEEF;
        let raw = encode_hierarchy_event(XI_OPCODE, &n);

        let Some(XiEvent::HierarchyChanged(decoded)) = decode_event(&raw, XI_OPCODE).unwrap()
        else {
            panic!("expected a hierarchy event");
        };

        assert_eq!(decoded.time, 0xDEAD_BEEF);
        assert_eq!(decoded.records[0].attachment, DeviceId(2));
    }

    #[test]
    fn test_decode_ignores_foreign_opcode() {
        let raw = encode_hierarchy_event(XI_OPCODE + 1, &slave_added(7));
        assert_eq!(decode_event(&raw, XI_OPCODE), Ok(None));
    }

    #[test]
    fn test_decode_ignores_core_events() {
        // Arrange – a MotionNotify (type 6) core event
        let mut raw = vec![0u8; EVENT_HEADER_SIZE];
        raw[0] = 6;
        raw[1] = XI_OPCODE;

        // Act / Assert
        assert_eq!(decode_event(&raw, XI_OPCODE), Ok(None));
    }

    #[test]
    fn test_decode_accepts_send_event_bit() {
        let mut raw = encode_hierarchy_event(XI_OPCODE, &slave_added(7));
        raw[0] |= 0x80;
        assert!(matches!(
            decode_event(&raw, XI_OPCODE),
            Ok(Some(XiEvent::HierarchyChanged(_)))
        ));
    }

    #[test]
    fn test_decode_device_changed_is_other() {
        let raw = encode_generic_event(XI_OPCODE, XI_DEVICE_CHANGED);
        assert_eq!(
            decode_event(&raw, XI_OPCODE),
            Ok(Some(XiEvent::Other {
                evtype: XI_DEVICE_CHANGED
            }))
        );
    }

    #[test]
    fn test_decode_short_buffer_is_error() {
        let result = decode_event(&[GE_GENERIC_EVENT, XI_OPCODE], XI_OPCODE);
        assert_eq!(
            result,
            Err(DecodeError::InsufficientData {
                needed: EVENT_HEADER_SIZE,
                available: 2
            })
        );
    }

    #[test]
    fn test_decode_truncated_records_is_length_mismatch() {
        // Arrange – drop the last byte of the only record
        let mut raw = encode_hierarchy_event(XI_OPCODE, &slave_added(7));
        raw.pop();

        // Act
        let result = decode_event(&raw, XI_OPCODE);

        // Assert
        assert_eq!(
            result,
            Err(DecodeError::LengthMismatch {
                declared: EVENT_HEADER_SIZE + HIERARCHY_INFO_SIZE,
                available: EVENT_HEADER_SIZE + HIERARCHY_INFO_SIZE - 1
            })
        );
    }

    #[test]
    fn test_decode_num_info_beyond_length_is_error() {
        // Arrange – claim two records while carrying one
        let mut raw = encode_hierarchy_event(XI_OPCODE, &slave_added(7));
        raw[20..22].copy_from_slice(&2u16.to_ne_bytes());

        // Act / Assert
        assert_eq!(
            decode_event(&raw, XI_OPCODE),
            Err(DecodeError::RecordOverflow {
                num_info: 2,
                room: HIERARCHY_INFO_SIZE
            })
        );
    }
}
