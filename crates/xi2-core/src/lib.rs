//! # xi2-core
//!
//! Shared library for xi2-detach containing the device-hierarchy domain
//! types, the XI2 generic-event decoder, and the hierarchy-change classifier.
//!
//! It has zero dependencies on X11 client libraries or sockets: every input
//! is either a plain Rust value or a raw event buffer, which keeps the whole
//! crate testable without a running X server.
//!
//! # Architecture overview (for beginners)
//!
//! The X Input Extension 2 (XI2) organises input devices in a two-level
//! tree.  *Master* devices are virtual pointers and keyboards that
//! applications see; *slave* devices are the physical mice, touchpads and
//! keyboards whose events are routed through a master.  Whenever that tree
//! changes the server sends a `HierarchyChanged` event listing every device
//! that was added, removed, attached or detached.
//!
//! This crate defines:
//!
//! - **`domain`** – Device ids, change flags, the action labels derived from
//!   them and the classifier that turns one notification into a sequence of
//!   `(device, label)` pairs.
//!
//! - **`protocol`** – How a raw generic event buffer read from the X
//!   connection becomes a typed [`XiEvent`], plus the static event mask the
//!   monitor subscribes with.

pub mod domain;
pub mod protocol;

pub use domain::action::{ActionLabel, Notice};
pub use domain::classify::classify;
pub use domain::device::{ChangeFlags, DeviceId, HierarchyChangeRecord, HierarchyNotification};
pub use protocol::codec::{decode_event, DecodeError, XiEvent};
pub use protocol::mask::EventMask;
