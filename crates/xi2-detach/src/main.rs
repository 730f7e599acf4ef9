//! xi2-detach entry point.
//!
//! Parses the command line, loads the optional config file, initialises
//! logging, and hands over to the hierarchy monitor.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Cli::try_parse()             -- -h/--help or a bad flag: usage, exit 1
//!  └─ load_config()                -- optional TOML file
//!  └─ init_tracing()               -- notices and diagnostics on stderr
//!  └─ X11InputServer::connect()    -- $DISPLAY or --display
//!  └─ HierarchyMonitor::initialize()
//!  └─ HierarchyMonitor::run_loop() -- never returns while the server lives
//! ```
//!
//! # Exit status
//!
//! The monitor has no successful exit path: asking for help, passing an
//! unknown option, failing to start, and losing the server all exit with a
//! failure status.

use std::convert::Infallible;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::{error, info};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use xi2_detach::application::monitor::HierarchyMonitor;
use xi2_detach::config::{load_config, MonitorConfig, DEFAULT_LOG_LEVEL};
use xi2_detach::infrastructure::x11::X11InputServer;
use xi2_detach::logging;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Detach every newly added XI2 slave device from its master.
///
/// Runs until killed.  Each hierarchy change is printed on standard error.
#[derive(Debug, Parser)]
#[command(name = "xi2-detach")]
struct Cli {
    /// X display to connect to (defaults to $DISPLAY).
    #[arg(long)]
    display: Option<String>,

    /// TOML configuration file.
    #[arg(long, env = "XI2_DETACH_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => {
            // Help and bad options alike: usage on stdout, failure status.
            print!("{}", Cli::command().render_help());
            return ExitCode::FAILURE;
        }
    };

    let config = match cli.config.as_deref().map(load_config).transpose() {
        Ok(file) => file.unwrap_or_default().with_display(cli.display),
        Err(e) => {
            init_tracing(DEFAULT_LOG_LEVEL);
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log_level);

    match run(&config) {
        Ok(never) => match never {},
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Connects, initialises and runs the monitor.  Only returns on failure.
fn run(config: &MonitorConfig) -> anyhow::Result<Infallible> {
    let server = X11InputServer::connect(config.display.as_deref())?;
    let mut monitor = HierarchyMonitor::new(server, config.client_version);
    monitor.initialize()?;

    info!("detaching every newly added slave device; press Ctrl-C to stop");
    let never = monitor
        .run_loop()
        .context("hierarchy monitor stopped")?;
    Ok(never)
}

/// Initialises notices and diagnostics on stderr.
///
/// `RUST_LOG` wins over `level` when set.  Neither affects the notices.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    logging::subscriber(filter, std::io::stderr).init();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag_is_a_parse_failure() {
        // Arrange / Act
        let short = Cli::try_parse_from(["xi2-detach", "-h"]);
        let long = Cli::try_parse_from(["xi2-detach", "--help"]);

        // Assert – main() maps every parse failure to usage + exit failure
        assert_eq!(short.unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(long.unwrap_err().kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let result = Cli::try_parse_from(["xi2-detach", "--bogus"]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_stray_positional_argument_is_rejected() {
        assert!(Cli::try_parse_from(["xi2-detach", "now"]).is_err());
    }

    #[test]
    fn test_no_arguments_parses() {
        let cli = Cli::try_parse_from(["xi2-detach"]).unwrap();
        assert!(cli.display.is_none());
    }

    #[test]
    fn test_display_flag_is_taken_verbatim() {
        let cli = Cli::try_parse_from(["xi2-detach", "--display", ":3"]).unwrap();
        assert_eq!(cli.display.as_deref(), Some(":3"));
    }

    #[test]
    fn test_usage_mentions_both_options() {
        let usage = Cli::command().render_help().to_string();
        assert!(usage.contains("--display"));
        assert!(usage.contains("--config"));
    }
}
