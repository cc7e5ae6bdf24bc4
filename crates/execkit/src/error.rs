use thiserror::Error;

/// Errors raised while launching a child process.
///
/// A process that starts and exits non-zero is *not* an error at this level;
/// it is reported through [`crate::CommandOutput`] so callers can decide what a
/// given exit code means.
#[derive(Debug, Error)]
pub enum Error {
    /// The program could not be found on `$PATH` (or at the given path)
    #[error("program not found: {0}")]
    ProgramNotFound(String),

    /// The process could not be spawned or waited on
    #[error("failed to execute {command}: {source}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns true if the program itself is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ProgramNotFound(_))
    }
}

/// Result type for process execution
pub type Result<T> = std::result::Result<T, Error>;
