//! The state tracker: locked reads of the state file plus S3 mirroring.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use execkit::ProcessRunner;

use crate::error::{Error, Result};
use crate::lock::{LockFile, lock_path_for};
use crate::remote::RemoteStateConfig;
use crate::types::ResourceState;

/// Exit code `aws s3 cp` uses when the source object does not exist.
pub const NOT_FOUND_EXIT_CODE: i32 = 1;

/// What a [`StateTracker::pull`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// Remote sync is not configured; nothing was run
    Disabled,
    /// The remote copy replaced the local file
    Pulled,
    /// No remote copy exists yet; the local file was left alone
    NotFound,
}

/// Reads the resource state file and mirrors it to S3.
///
/// The tracker is a reader-only participant in the lock protocol: it takes
/// shared locks on the sidecar lock file and never writes identifiers.
/// Only [`pull`](Self::pull) replaces the local file, by atomic rename.
pub struct StateTracker {
    state_file: PathBuf,
    lock_path: PathBuf,
    remote: Option<RemoteStateConfig>,
    runner: Box<dyn ProcessRunner>,
}

impl StateTracker {
    /// Create a tracker for `state_file`.
    pub fn new(
        state_file: impl Into<PathBuf>,
        remote: Option<RemoteStateConfig>,
        runner: Box<dyn ProcessRunner>,
    ) -> Self {
        let state_file = state_file.into();
        let lock_path = lock_path_for(&state_file);
        Self {
            state_file,
            lock_path,
            remote,
            runner,
        }
    }

    /// Path of the state file
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Path of the sidecar lock file
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Remote configuration, if remote sync is enabled
    pub fn remote(&self) -> Option<&RemoteStateConfig> {
        self.remote.as_ref()
    }

    /// Whether remote sync is enabled
    pub fn is_remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Load the current state.
    ///
    /// With remote sync enabled the remote copy is pulled first; a failed pull
    /// is logged and the local file is used. Never fails: a missing file or an
    /// unreadable document yields an empty state.
    pub fn load(&self) -> ResourceState {
        if let Some(remote) = &self.remote
            && let Err(e) = self.pull()
        {
            log::warn!(
                "Could not pull state from {}, using local copy: {}",
                remote.uri(),
                e
            );
        }

        self.load_local()
    }

    /// Load the local state file without contacting the remote.
    pub fn load_local(&self) -> ResourceState {
        match self.read_locked() {
            Ok(state) => state,
            Err(e) => {
                log::warn!("{e}; treating state as empty");
                ResourceState::default()
            }
        }
    }

    /// Fetch the remote copy into the local state file.
    pub fn pull(&self) -> Result<PullOutcome> {
        let Some(remote) = &self.remote else {
            return Ok(PullOutcome::Disabled);
        };

        let uri = remote.uri();
        let download = self.download_path();
        log::info!("Pulling state from {uri}");

        let output = match self.runner.run(&remote.download_spec(&download)) {
            Ok(output) => output,
            Err(e) => {
                remove_quietly(&download);
                return Err(e.into());
            }
        };

        if output.success() {
            let _guard = self.shared_lock();
            if let Err(e) = fs::rename(&download, &self.state_file) {
                remove_quietly(&download);
                return Err(e.into());
            }
            log::info!("Pulled state from {uri}");
            return Ok(PullOutcome::Pulled);
        }

        remove_quietly(&download);

        if output.code == Some(NOT_FOUND_EXIT_CODE) {
            log::info!("No remote state at {uri} (first run)");
            return Ok(PullOutcome::NotFound);
        }

        Err(Error::Transfer {
            uri,
            output: output.combined(),
        })
    }

    /// Upload the local state file to the remote copy.
    pub fn push(&self) -> Result<()> {
        let Some(remote) = &self.remote else {
            return Ok(());
        };

        if !self.state_file.exists() {
            return Err(Error::NoLocalState(self.state_file.clone()));
        }

        let uri = remote.uri();
        log::info!("Pushing state to {uri}");

        let output = {
            let _guard = self.shared_lock();
            self.runner.run(&remote.upload_spec(&self.state_file))?
        };

        if !output.success() {
            return Err(Error::Transfer {
                uri,
                output: output.combined(),
            });
        }

        log::info!("Pushed state to {uri}");
        Ok(())
    }

    fn read_locked(&self) -> Result<ResourceState> {
        let _guard = self.shared_lock();

        let bytes = match fs::read(&self.state_file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No state file at {}", self.state_file.display());
                return Ok(ResourceState::default());
            }
            Err(e) => return Err(e.into()),
        };

        ResourceState::from_json(&bytes).map_err(|source| Error::Decode {
            path: self.state_file.clone(),
            source,
        })
    }

    /// Shared lock on the sidecar file, or `None` (with a warning) when
    /// locking is not possible here.
    fn shared_lock(&self) -> Option<LockFile> {
        match LockFile::shared(&self.lock_path) {
            Ok(lock) => Some(lock),
            Err(e) => {
                log::warn!("{e}; continuing without a lock");
                None
            }
        }
    }

    fn download_path(&self) -> PathBuf {
        let mut os = self.state_file.as_os_str().to_owned();
        os.push(format!(".download.{}", std::process::id()));
        PathBuf::from(os)
    }
}

impl std::fmt::Debug for StateTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateTracker")
            .field("state_file", &self.state_file)
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != ErrorKind::NotFound
    {
        log::debug!("Could not remove {}: {}", path.display(), e);
    }
}
