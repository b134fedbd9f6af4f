//! Error types for scout-probe

use std::path::PathBuf;
use std::time::Duration;

use scout_fs::NormalizedPath;

/// Result type for scout-probe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building probes.
///
/// Probing itself never fails with these; see [`ProbeSkip`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Probe strategy '{strategy}' needs a name pattern")]
    MissingPattern { strategy: String },

    #[error("Unknown toolchain kind: {0}")]
    UnknownKind(String),
}

/// Failure to obtain output from a version query.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("Failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} did not exit within {timeout:?}", program.display())]
    TimedOut { program: PathBuf, timeout: Duration },

    #[error("I/O error while running {}: {source}", program.display())]
    Io {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a candidate was not accepted as an installation.
///
/// Absence is the normal case when scanning, so skips are logged at trace
/// level and never fail a scan.
#[derive(Debug, thiserror::Error)]
pub enum ProbeSkip {
    #[error("'{name}' does not match the install name pattern")]
    NameMismatch { name: String },

    #[error("no compiler binary at {path}")]
    MissingBinary { path: NormalizedPath },

    #[error("version query failed: {0}")]
    Invocation(#[from] InvocationError),

    #[error("no usable version for {path}")]
    NoVersion { path: NormalizedPath },
}
