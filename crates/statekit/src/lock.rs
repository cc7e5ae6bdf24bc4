//! Advisory locks on the sidecar lock file.
//!
//! The provisioning scripts serialize their writes with `flock(1)` on
//! `<state file>.lock`. Readers here take the same `flock(2)` lock in shared
//! mode so a read never observes a half-written document. The lock file's
//! content is irrelevant; only the lock on its descriptor matters.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Suffix appended to the state file path to form the lock file path.
pub const LOCK_SUFFIX: &str = ".lock";

/// Path of the sidecar lock file for `state_file`.
pub fn lock_path_for(state_file: &Path) -> PathBuf {
    let mut os = state_file.as_os_str().to_owned();
    os.push(LOCK_SUFFIX);
    PathBuf::from(os)
}

/// Lock mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Any number of readers
    Shared,
    /// A single writer, no readers
    Exclusive,
}

/// A held lock. Released when dropped.
#[derive(Debug)]
pub struct LockFile {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl LockFile {
    /// Block until a shared lock on `path` is held.
    pub fn shared(path: &Path) -> Result<Self> {
        Self::acquire(path, LockMode::Shared)
    }

    /// Block until an exclusive lock on `path` is held.
    ///
    /// The tracker never calls this; it exists for cooperating writers.
    pub fn exclusive(path: &Path) -> Result<Self> {
        Self::acquire(path, LockMode::Exclusive)
    }

    /// Take a shared lock without blocking. `Ok(None)` if a writer holds it.
    pub fn try_shared(path: &Path) -> Result<Option<Self>> {
        Self::try_acquire(path, LockMode::Shared)
    }

    /// Take an exclusive lock without blocking. `Ok(None)` if anyone holds it.
    pub fn try_exclusive(path: &Path) -> Result<Option<Self>> {
        Self::try_acquire(path, LockMode::Exclusive)
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode the lock is held in
    pub fn mode(&self) -> LockMode {
        self.mode
    }

    fn acquire(path: &Path, mode: LockMode) -> Result<Self> {
        let file = open(path)?;
        sys::lock(&file, mode, true).map_err(|source| lock_error(path, source))?;
        log::debug!("acquired {:?} lock on {}", mode, path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
            mode,
        })
    }

    fn try_acquire(path: &Path, mode: LockMode) -> Result<Option<Self>> {
        let file = open(path)?;
        match sys::lock(&file, mode, false) {
            Ok(()) => Ok(Some(Self {
                file,
                path: path.to_path_buf(),
                mode,
            })),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(source) => Err(lock_error(path, source)),
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        // Closing the descriptor releases the lock too; unlock explicitly so
        // the release does not depend on when the File is closed.
        if let Err(e) = sys::unlock(&self.file) {
            log::debug!("unlock of {} failed: {}", self.path.display(), e);
        }
    }
}

fn lock_error(path: &Path, source: std::io::Error) -> Error {
    Error::Lock {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(unix)]
fn open(path: &Path) -> Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .mode(0o666)
        .open(path)
        .map_err(|source| lock_error(path, source))
}

#[cfg(not(unix))]
fn open(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|source| lock_error(path, source))
}

#[cfg(unix)]
mod sys {
    use super::LockMode;
    use std::fs::File;
    use std::io;
    use std::os::unix::io::AsRawFd;

    pub fn lock(file: &File, mode: LockMode, blocking: bool) -> io::Result<()> {
        let mut op = match mode {
            LockMode::Shared => libc::LOCK_SH,
            LockMode::Exclusive => libc::LOCK_EX,
        };
        if !blocking {
            op |= libc::LOCK_NB;
        }
        flock(file, op)
    }

    pub fn unlock(file: &File) -> io::Result<()> {
        flock(file, libc::LOCK_UN)
    }

    fn flock(file: &File, op: libc::c_int) -> io::Result<()> {
        loop {
            // SAFETY: the descriptor is owned by `file` and open for the call.
            let rc = unsafe { libc::flock(file.as_raw_fd(), op) };
            if rc == 0 {
                return Ok(());
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

#[cfg(not(unix))]
mod sys {
    use super::LockMode;
    use std::fs::File;
    use std::io;

    pub fn lock(_file: &File, _mode: LockMode, _blocking: bool) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "flock is not available on this platform",
        ))
    }

    pub fn unlock(_file: &File) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_suffix() {
        let path = lock_path_for(Path::new("/srv/app/created_resources.json"));
        assert_eq!(path, PathBuf::from("/srv/app/created_resources.json.lock"));
    }

    #[test]
    fn test_shared_locks_coexist() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json.lock");

        let first = LockFile::shared(&path).unwrap();
        let second = LockFile::try_shared(&path).unwrap();
        assert!(second.is_some());
        assert_eq!(first.mode(), LockMode::Shared);
        assert!(path.exists());
    }

    #[test]
    fn test_exclusive_excludes_readers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json.lock");

        let writer = LockFile::exclusive(&path).unwrap();
        assert!(LockFile::try_shared(&path).unwrap().is_none());
        drop(writer);
        assert!(LockFile::try_shared(&path).unwrap().is_some());
    }

    #[test]
    fn test_reader_blocks_excluding_writer() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json.lock");

        let reader = LockFile::shared(&path).unwrap();
        assert!(LockFile::try_exclusive(&path).unwrap().is_none());
        drop(reader);
        assert!(LockFile::try_exclusive(&path).unwrap().is_some());
    }

    #[test]
    fn test_shared_waits_for_writer_release() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json.lock");
        let writer = LockFile::exclusive(&path).unwrap();

        let (tx, rx) = mpsc::channel();
        let reader_path = path.clone();
        let handle = thread::spawn(move || {
            let _lock = LockFile::shared(&reader_path).unwrap();
            tx.send(()).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        drop(writer);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_open_failure_is_lock_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing-dir").join("state.json.lock");
        let err = LockFile::shared(&path).unwrap_err();
        assert!(err.is_lock());
    }
}
