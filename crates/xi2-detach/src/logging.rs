//! Output on standard error.
//!
//! Two `fmt` layers share the writer:
//!
//! - **notices** (target [`NOTICE_TARGET`]): one bare line per hierarchy
//!   change, e.g. `Wacom Intuos Pen (7) slave added.`  No timestamp, no
//!   level, and not subject to the log filter, so `log_level = "warn"` still
//!   prints them.
//! - **diagnostics** (every other target): the usual timestamped `fmt`
//!   output, filtered by `RUST_LOG` or the configured `log_level`.

use tracing::Subscriber;
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;

/// Target of the per-change notice lines.
pub const NOTICE_TARGET: &str = "xi2_detach::notice";

/// Builds the process-wide subscriber writing to `writer`.
pub fn subscriber<W>(diagnostics: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
{
    let notices = fmt::layer()
        .with_writer(writer.clone())
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .with_filter(filter_fn(|meta| meta.target() == NOTICE_TARGET));

    let diagnostics = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_filter(filter_fn(|meta| meta.target() != NOTICE_TARGET))
        .with_filter(diagnostics);

    tracing_subscriber::registry().with(notices).with(diagnostics)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::{info, warn};

    /// Collects everything written by the subscriber.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_notice_is_a_bare_line_even_when_filter_is_warn() {
        // Arrange
        let capture = Capture::default();
        let subscriber = subscriber(EnvFilter::new("warn"), capture.clone());

        // Act
        tracing::subscriber::with_default(subscriber, || {
            info!(target: NOTICE_TARGET, "Wacom Intuos Pen (7) slave added.");
        });

        // Assert
        assert_eq!(capture.text(), "Wacom Intuos Pen (7) slave added.\n");
    }

    #[test]
    fn test_diagnostics_follow_the_filter() {
        // Arrange
        let capture = Capture::default();
        let subscriber = subscriber(EnvFilter::new("warn"), capture.clone());

        // Act
        tracing::subscriber::with_default(subscriber, || {
            info!("connected to X server");
            warn!("XIChangeHierarchy failed: Device");
        });

        // Assert
        let text = capture.text();
        assert!(!text.contains("connected to X server"));
        assert!(text.contains("XIChangeHierarchy failed: Device"));
        assert!(text.contains("WARN"));
    }
}
