use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or synchronizing resource state.
///
/// Only [`Error::NoLocalState`] and [`Error::Transfer`] ever reach callers of
/// the public tracker operations. Lock and decode failures are recovered
/// inside [`crate::StateTracker::load`] and only show up in logs.
#[derive(Debug, Error)]
pub enum Error {
    /// Push requested but there is no local state file
    #[error("no local state file to push: {0}")]
    NoLocalState(PathBuf),

    /// The remote copy command exited non-zero
    #[error("state transfer failed for {uri}: {output}")]
    Transfer {
        /// Remote object URI
        uri: String,
        /// Diagnostic output of the copy command
        output: String,
    },

    /// The sidecar lock could not be acquired
    #[error("could not lock {}: {source}", path.display())]
    Lock {
        /// Lock file path
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The state file is not a valid state document
    #[error("malformed state file {}: {source}", path.display())]
    Decode {
        /// State file path
        path: PathBuf,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The copy command could not be launched
    #[error(transparent)]
    Process(#[from] execkit::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for failures of the remote copy itself.
    pub fn is_transfer(&self) -> bool {
        matches!(self, Error::Transfer { .. } | Error::Process(_))
    }

    /// Returns true when a read can safely continue without the lock.
    pub fn is_lock(&self) -> bool {
        matches!(self, Error::Lock { .. })
    }
}

/// Result type for state operations
pub type Result<T> = std::result::Result<T, Error>;
