//! Infrastructure layer for the hierarchy monitor.
//!
//! Contains the implementations of the application's
//! [`InputServer`](crate::application::server::InputServer) port.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `xi2_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`x11`** – The production server: an `x11rb` connection speaking the
//!   XInputExtension protocol.
//!
//! - **`mock`** – An in-memory server that replays a scripted event queue
//!   and records every request, for integration tests.

pub mod mock;
pub mod x11;
