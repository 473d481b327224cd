//! Error types for source access and scan runs.

use thiserror::Error;

use repotally_core::ConfigError;

/// Failure talking to the component source.
///
/// Any source error is fatal to the run: there is no retry at this layer and
/// no partial report.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level failure (connect, TLS, body, decode).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Source-defined failure, used by non-HTTP implementations.
    #[error("{message}")]
    Other { message: String },
}

/// Failure of one scan run: either the configuration was rejected before any
/// fetch, or a source call failed mid-run.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
