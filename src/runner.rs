use execkit::{ProcessRunner, ProcessSpec};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Settings;
use crate::ui;

/// Interpreter used for every provisioning script
pub const SHELL: &str = "bash";

/// Flag asking a script to report what it would do without doing it
pub const DRY_RUN_FLAG: &str = "--dry-run";

/// Flag making the cleanup script skip its own confirmation
pub const FORCE_FLAG: &str = "--force";

/// Names of the externally-maintained scripts under `scripts/`
pub mod scripts {
    pub const SECURITY_GROUP: &str = "create_security_group.sh";
    pub const EC2: &str = "create_ec2.sh";
    pub const S3_BUCKET: &str = "create_s3_bucket.sh";
    pub const CLEANUP: &str = "cleanup_resources.sh";
    pub const INIT_STATE: &str = "init_state.sh";
}

/// Why a script did not succeed
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Script not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Script execution failed: {name}")]
    Failed { name: String, code: Option<i32> },

    #[error("Script could not be started: {0}")]
    Spawn(#[from] execkit::Error),
}

/// Runs provisioning scripts from the scripts directory.
///
/// Scripts run under `bash` from the project root with the parent's
/// environment and terminal, so their prompts and colors reach the user.
/// Calls block until the script exits.
pub struct ScriptInvoker<'a> {
    settings: &'a Settings,
    runner: &'a dyn ProcessRunner,
}

impl<'a> ScriptInvoker<'a> {
    pub fn new(settings: &'a Settings, runner: &'a dyn ProcessRunner) -> Self {
        Self { settings, runner }
    }

    /// Full path of a script
    pub fn script_path(&self, name: &str) -> PathBuf {
        self.settings.scripts_dir.join(name)
    }

    /// Process description for running `name` with `extra_args`
    pub fn spec(&self, name: &str, extra_args: &[&str]) -> ProcessSpec {
        ProcessSpec::new(SHELL)
            .path_arg(&self.script_path(name))
            .args(extra_args.iter().copied())
            .cwd(&self.settings.project_root)
            .inherit_env(true)
            .inherit_stdio()
    }

    /// Run a script, returning why it failed.
    pub fn run(&self, name: &str, extra_args: &[&str]) -> Result<(), ScriptError> {
        let path = self.script_path(name);
        if !path.exists() {
            return Err(ScriptError::NotFound(path));
        }

        let output = self.runner.run(&self.spec(name, extra_args))?;
        if output.success() {
            Ok(())
        } else {
            Err(ScriptError::Failed {
                name: name.to_string(),
                code: output.code,
            })
        }
    }

    /// Run a script and report failure to the user.
    ///
    /// Returns true iff the script exited zero.
    pub fn execute(&self, name: &str, extra_args: &[&str]) -> bool {
        match self.run(name, extra_args) {
            Ok(()) => true,
            Err(e) => {
                ui::error(&e.to_string());
                if let ScriptError::Failed {
                    code: Some(code), ..
                } = e
                {
                    ui::dim(&format!("exit code {code}"));
                }
                false
            }
        }
    }
}
