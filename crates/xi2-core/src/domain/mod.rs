//! Domain entities for xi2-detach.
//!
//! This module contains pure logic with no X11 or OS dependencies.  The
//! infrastructure layer of the `xi2-detach` crate translates server replies
//! into these types; everything in here can be unit-tested in isolation.

/// Device ids, change flags and hierarchy notifications.
pub mod device;

/// Action labels and the human-readable notice format.
pub mod action;

/// The hierarchy-change classifier.
pub mod classify;
