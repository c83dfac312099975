//! # Design
//!
//! - Centralize errors for the preview server and the translation audit.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors raised by the `serve` and `audit` commands.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding the listener failed for a reason other than the port being taken.
    #[error("failed to bind preview listener")]
    Bind {
        /// Address attempted.
        addr: SocketAddr,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Every candidate port was already in use.
    #[error("no free port available")]
    PortsExhausted {
        /// Interface attempted.
        ip: IpAddr,
        /// First port attempted.
        first: u16,
        /// Number of consecutive ports attempted.
        attempts: u16,
    },
    /// Serving requests failed.
    #[error("preview server terminated unexpectedly")]
    Serve {
        /// Underlying IO error.
        source: io::Error,
    },
    /// The site root does not exist or is not a directory.
    #[error("site root is not a directory")]
    MissingRoot {
        /// Path supplied.
        path: PathBuf,
    },
    /// Localization configuration could not be read or validated.
    #[error("localization configuration is invalid")]
    Config {
        /// Configuration file, when one was supplied.
        path: Option<PathBuf>,
        /// Source configuration error.
        source: pageminer_i18n::ConfigError,
    },
    /// IO operations failed.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Optional path involved in the failure.
        path: Option<PathBuf>,
        /// Source IO error.
        source: io::Error,
    },
    /// Building the HTTP client failed.
    #[error("http client construction failed")]
    HttpClient {
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// Rendering the audit report failed.
    #[error("failed to render audit report")]
    Render {
        /// Source serialization error.
        source: serde_json::Error,
    },
    /// The fallback locale could not be loaded, so every lookup degrades to keys.
    #[error("fallback locale dictionary unavailable")]
    FallbackUnavailable {
        /// Fallback locale code.
        locale: String,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: pageminer_telemetry::TelemetryError,
    },
}

impl ServerError {
    pub(crate) const fn io(
        operation: &'static str,
        path: Option<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path,
            source,
        }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: pageminer_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }
}
