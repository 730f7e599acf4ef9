//! ExtensionNegotiator: queries and caches the X Input extension version.
//!
//! # Why announce a version? (for beginners)
//!
//! An XI2 server adapts some behaviour to the protocol version a client says
//! it understands.  A client that never calls `XIQueryVersion` is treated as
//! an XI1 client.  So after learning the server's major version we tell the
//! server which XI2 version we speak.  The server may answer with a lower
//! version; the answer is logged but not otherwise checked.

use tracing::{debug, warn};

use crate::application::error::StartupError;
use crate::application::server::{ExtensionVersion, InputServer, ServerError};

/// Lowest major version that has hierarchy events.
pub const MIN_XI2_MAJOR: u16 = 2;

/// Per-monitor cache of the server's major extension version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionCache {
    #[default]
    Unqueried,
    Queried(u16),
}

/// Negotiates the extension version once and remembers the result.
#[derive(Debug)]
pub struct ExtensionNegotiator {
    cache: VersionCache,
    client_version: ExtensionVersion,
}

impl ExtensionNegotiator {
    /// Creates a negotiator that will announce `client_version`.
    pub fn new(client_version: ExtensionVersion) -> Self {
        Self {
            cache: VersionCache::Unqueried,
            client_version,
        }
    }

    /// Current cache state.
    pub fn cache(&self) -> VersionCache {
        self.cache
    }

    /// Returns the server's major extension version.
    ///
    /// The first successful call queries the server, caches the major
    /// version and, for XI2 servers, announces the client version.  Later
    /// calls return the cached value without any server round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::VersionUnavailable`] if the server has no
    /// version descriptor for the extension, or [`StartupError::Server`] if
    /// the connection fails.
    pub fn negotiate<S: InputServer + ?Sized>(&mut self, server: &S) -> Result<u16, StartupError> {
        if let VersionCache::Queried(major) = self.cache {
            return Ok(major);
        }

        let version = server
            .extension_version()?
            .ok_or(StartupError::VersionUnavailable)?;
        self.cache = VersionCache::Queried(version.major);
        debug!(
            "server XInput version {}.{}",
            version.major, version.minor
        );

        if version.major >= MIN_XI2_MAJOR {
            match server.announce_version(self.client_version) {
                Ok(agreed) => debug!(
                    "announced XI {}.{}, server agreed to {}.{}",
                    self.client_version.major,
                    self.client_version.minor,
                    agreed.major,
                    agreed.minor
                ),
                Err(e @ ServerError::Connection(_)) => return Err(e.into()),
                Err(e) => warn!("version announcement ignored: {e}"),
            }
        }

        Ok(version.major)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
