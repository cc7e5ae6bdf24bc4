//! The runner trait and its real implementation.

use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::spec::{CommandOutput, ProcessSpec, StdioMode};

/// Executes a [`ProcessSpec`] and reports how it finished.
///
/// Implementations block until the child exits. There is no timeout.
pub trait ProcessRunner: Send + Sync {
    /// Run the process described by `spec`.
    fn run(&self, spec: &ProcessSpec) -> Result<CommandOutput>;

    /// Run and return only whether the process exited zero.
    ///
    /// Spawn failures count as failure.
    fn succeeds(&self, spec: &ProcessSpec) -> bool {
        self.run(spec).map(|o| o.success()).unwrap_or(false)
    }
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for std::sync::Arc<R> {
    fn run(&self, spec: &ProcessSpec) -> Result<CommandOutput> {
        (**self).run(spec)
    }
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(spec: &ProcessSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        if !spec.inherit_env {
            cmd.env_clear();
        }

        match spec.stdio {
            StdioMode::Inherit => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            StdioMode::Capture => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
        }

        cmd
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &ProcessSpec) -> Result<CommandOutput> {
        log::debug!("exec: {}", spec.display());

        let mut cmd = Self::command(spec);
        let result = match spec.stdio {
            StdioMode::Inherit => cmd.status().map(|status| CommandOutput {
                code: status.code(),
                ..Default::default()
            }),
            StdioMode::Capture => cmd.output().map(CommandOutput::from),
        };

        let output = result.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ProgramNotFound(spec.program.clone())
            } else {
                Error::Spawn {
                    command: spec.display(),
                    source: e,
                }
            }
        })?;

        log::debug!("exit: {:?} ({})", output.code, spec.program);
        Ok(output)
    }
}
