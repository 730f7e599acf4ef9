//! EventSubscriber: registers the monitor's interest in hierarchy changes.

use tracing::debug;
use xi2_core::EventMask;

use crate::application::server::{InputServer, ServerError};

/// Selects [`EventMask::hierarchy_watch`] on the root window.
///
/// The selection covers every device, so this is one global subscription.
/// Returns once the server has applied it.
///
/// # Errors
///
/// Returns [`ServerError`] if the server rejects the selection or the
/// connection fails.
pub fn subscribe<S: InputServer + ?Sized>(server: &S) -> Result<EventMask, ServerError> {
    let mask = EventMask::hierarchy_watch();
    server.select_events(mask)?;
    debug!(
        "selected XI2 events {:#06x} for device {}",
        mask.bits(),
        mask.device_id()
    );
    Ok(mask)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::server::MockInputServer;
    use mockall::predicate::eq;

    #[test]
    fn test_subscribe_selects_hierarchy_watch_mask_once() {
        // Arrange
        let mut server = MockInputServer::new();
        server
            .expect_select_events()
            .with(eq(EventMask::hierarchy_watch()))
            .times(1)
            .returning(|_| Ok(()));

        // Act
        let mask = subscribe(&server).unwrap();

        // Assert
        assert_eq!(mask, EventMask::hierarchy_watch());
    }

    #[test]
    fn test_subscribe_propagates_server_error() {
        let mut server = MockInputServer::new();
        server.expect_select_events().returning(|_| {
            Err(ServerError::Request {
                request: "XISelectEvents",
                reason: "Value".into(),
            })
        });

        assert!(subscribe(&server).is_err());
    }
}
