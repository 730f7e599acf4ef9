//! Application layer use cases for the hierarchy monitor.
//!
//! # What use cases does the monitor have?
//!
//! - **`negotiate`** – Queries the X Input extension version once per
//!   monitor, caches it and announces the client's own XI2 version.
//!
//! - **`subscribe`** – Selects hierarchy and device-changed events for all
//!   devices on the root window.
//!
//! - **`detach`** – Sends one `DetachSlave` hierarchy change and waits for
//!   the server to process it.
//!
//! - **`monitor`** – The blocking read-classify-act loop tying the above
//!   together.
//!
//! Every server round-trip goes through the [`server::InputServer`] trait so
//! the use cases can be tested against a scripted server.

pub mod detach;
pub mod error;
pub mod monitor;
pub mod negotiate;
pub mod server;
pub mod subscribe;
