//! xi2-detach library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does xi2-detach do? (for beginners)
//!
//! It is a test harness for input-hotplug handling.  It connects to an X
//! server, asks to be told about every change of the XI2 device hierarchy,
//! and whenever a new physical (slave) device shows up attached to a master
//! it immediately detaches it again, leaving it *floating*.
//!
//! The process:
//!
//! 1. Checks that the X Input extension is present and speaks XI2.
//! 2. Subscribes to hierarchy events on the root window.
//! 3. Blocks on the next event, prints one line per changed device and
//!    detaches every newly added slave, waiting for the server to process
//!    each detach before reading the next event.
//!
//! It runs until it is killed or the server goes away.

/// Application layer: use cases and the port to the X server.
pub mod application;

/// Runtime configuration (TOML file plus command-line overrides).
pub mod config;

/// Infrastructure layer: the x11rb adapter and an in-memory test server.
pub mod infrastructure;

/// Notice lines and diagnostics on standard error.
pub mod logging;
