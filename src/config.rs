//! Start-up configuration.
//!
//! Everything the commands need to know about their surroundings is resolved
//! once in [`Settings::resolve`] and then passed around by reference.
//!
//! # Environment Variables
//!
//! - `AWS_AUTOMATOR_ROOT` - Override the project root (`~` and `$VARS` expand)
//! - `S3_STATE_BUCKET` / `S3_STATE_KEY` / `S3_STATE_REGION` / `AWS_REGION` -
//!   remote state backend, see [`statekit::remote`]
//!
//! A `.env` file in the project root is loaded before the remote settings
//! are read. Variables already present in the environment take precedence.
//!
//! # Project Root Resolution
//!
//! 1. `AWS_AUTOMATOR_ROOT` environment variable
//! 2. Parent of the executable's directory, when the executable lives in `bin/`
//! 3. Current working directory

use anyhow::{Context, Result};
use statekit::RemoteStateConfig;
use std::path::{Path, PathBuf};

/// Environment variable for project root override
pub const ENV_ROOT: &str = "AWS_AUTOMATOR_ROOT";

/// Directory (under the project root) holding the provisioning scripts
pub const SCRIPTS_DIR: &str = "scripts";

/// State file name (under the project root)
pub const STATE_FILE: &str = "created_resources.json";

/// Dotenv file name (under the project root)
pub const DOTENV_FILE: &str = ".env";

/// Immutable configuration shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project_root: PathBuf,
    pub scripts_dir: PathBuf,
    pub state_file: PathBuf,
    pub remote: Option<RemoteStateConfig>,
}

impl Settings {
    /// Resolve settings from the executable location and the environment.
    ///
    /// Fails only when the project root cannot be determined.
    pub fn resolve() -> Result<Self> {
        let root = resolve_root(
            std::env::var(ENV_ROOT).ok(),
            std::env::current_exe,
            std::env::current_dir,
        )?;

        load_dotenv(&root);

        let settings = Self::for_root(root, RemoteStateConfig::from_env());
        log::debug!("Settings: {settings:?}");
        Ok(settings)
    }

    /// Settings for a known project root.
    pub fn for_root(root: impl Into<PathBuf>, remote: Option<RemoteStateConfig>) -> Self {
        let project_root = root.into();
        Self {
            scripts_dir: project_root.join(SCRIPTS_DIR),
            state_file: project_root.join(STATE_FILE),
            project_root,
            remote,
        }
    }

    /// Whether the S3 state backend is configured
    pub fn is_remote_enabled(&self) -> bool {
        self.remote.is_some()
    }
}

/// Pick the project root.
///
/// `exe` is only consulted without an override, and `cwd` only when neither
/// the override nor the `bin/` layout applies. An unknown executable
/// location falls through to `cwd`.
pub fn resolve_root<E, C>(override_dir: Option<String>, exe: E, cwd: C) -> Result<PathBuf>
where
    E: FnOnce() -> std::io::Result<PathBuf>,
    C: FnOnce() -> std::io::Result<PathBuf>,
{
    if let Some(dir) = override_dir.filter(|d| !d.trim().is_empty()) {
        let path = expand(&dir);
        log::debug!("Using project root from {}: {}", ENV_ROOT, path.display());
        return Ok(path);
    }

    let exe = match exe() {
        Ok(exe) => Some(exe),
        Err(e) => {
            log::debug!("Could not determine executable location: {e}");
            None
        }
    };

    if let Some(bin) = exe.as_deref().and_then(Path::parent)
        && bin.file_name().is_some_and(|name| name == "bin")
        && let Some(root) = bin.parent()
    {
        log::debug!("Using project root above bin/: {}", root.display());
        return Ok(root.to_path_buf());
    }

    let dir = cwd().context("Could not determine current directory")?;
    log::debug!("Using current directory as project root: {}", dir.display());
    Ok(dir)
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

fn load_dotenv(root: &Path) {
    let path = root.join(DOTENV_FILE);
    if !path.exists() {
        return;
    }

    match dotenvy::from_path(&path) {
        Ok(()) => log::debug!("Loaded {}", path.display()),
        Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn no_cwd() -> std::io::Result<PathBuf> {
        Err(std::io::Error::other("cwd must not be consulted"))
    }

    fn no_exe() -> std::io::Result<PathBuf> {
        Err(std::io::Error::other("executable location unknown"))
    }

    fn exe(path: &str) -> impl FnOnce() -> std::io::Result<PathBuf> {
        let path = PathBuf::from(path);
        move || Ok(path)
    }

    #[test]
    fn test_root_from_override() {
        let root = resolve_root(
            Some("/srv/automator".to_string()),
            exe("/usr/local/bin/aws-automator"),
            no_cwd,
        )
        .unwrap();
        assert_eq!(root, PathBuf::from("/srv/automator"));
    }

    #[test]
    fn test_override_wins_without_executable_location() {
        let root = resolve_root(Some("/srv/automator".to_string()), no_exe, no_cwd).unwrap();
        assert_eq!(root, PathBuf::from("/srv/automator"));
    }

    #[test]
    fn test_unknown_executable_falls_back_to_cwd() {
        let root = resolve_root(None, no_exe, || Ok(PathBuf::from("/work"))).unwrap();
        assert_eq!(root, PathBuf::from("/work"));
    }

    #[test]
    fn test_root_from_bin_layout() {
        let root = resolve_root(None, exe("/opt/project/bin/aws-automator"), no_cwd).unwrap();
        assert_eq!(root, PathBuf::from("/opt/project"));
    }

    #[test]
    fn test_blank_override_ignored() {
        let root = resolve_root(
            Some("  ".to_string()),
            exe("/opt/project/bin/aws-automator"),
            no_cwd,
        )
        .unwrap();
        assert_eq!(root, PathBuf::from("/opt/project"));
    }

    #[test]
    fn test_root_falls_back_to_cwd() {
        let root = resolve_root(
            None,
            exe("/home/dev/project/target/debug/aws-automator"),
            || Ok(PathBuf::from("/home/dev/project")),
        )
        .unwrap();
        assert_eq!(root, PathBuf::from("/home/dev/project"));
    }

    #[test]
    fn test_cwd_failure_is_fatal() {
        let err = resolve_root(None, exe("/tmp/aws-automator"), no_cwd).unwrap_err();
        assert!(err.to_string().contains("current directory"));
    }

    #[test]
    fn test_for_root_layout() {
        let settings = Settings::for_root("/p", None);
        assert_eq!(settings.scripts_dir, PathBuf::from("/p/scripts"));
        assert_eq!(settings.state_file, PathBuf::from("/p/created_resources.json"));
        assert!(!settings.is_remote_enabled());
    }

    #[test]
    fn test_expand_plain_path() {
        assert_eq!(expand("/plain/path"), PathBuf::from("/plain/path"));
    }
}
