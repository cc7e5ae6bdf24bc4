//! Process descriptions and their results.

use std::path::{Path, PathBuf};
use std::process::Output;

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// stdin/stdout/stderr are passed through from the parent
    ///
    /// Interactive prompts and colored output from the child reach the user
    /// directly. Nothing is captured.
    Inherit,

    /// stdout/stderr are captured, stdin is closed
    #[default]
    Capture,
}

/// A complete description of a process to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    /// Program name or path
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Working directory (inherits the parent's when `None`)
    pub cwd: Option<PathBuf>,
    /// Stream wiring
    pub stdio: StdioMode,
    /// Whether the child sees the parent's environment variables
    pub inherit_env: bool,
}

impl ProcessSpec {
    /// Create a spec for `program` with no arguments, captured output and
    /// the parent's environment.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdio: StdioMode::Capture,
            inherit_env: true,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// Run the child in `dir`.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Pass stdin/stdout/stderr straight through.
    pub fn inherit_stdio(mut self) -> Self {
        self.stdio = StdioMode::Inherit;
        self
    }

    /// Capture stdout/stderr.
    pub fn capture(mut self) -> Self {
        self.stdio = StdioMode::Capture;
        self
    }

    /// Control whether the parent's environment is passed to the child.
    pub fn inherit_env(mut self, inherit: bool) -> Self {
        self.inherit_env = inherit;
        self
    }

    /// Render as a shell-like command line (for logs and error messages).
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    if word.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        format!("'{}'", word.replace('\'', r"'\''"))
    } else {
        word.to_string()
    }
}

/// Result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured stdout (empty when inherited)
    pub stdout: Vec<u8>,
    /// Captured stderr (empty when inherited)
    pub stderr: Vec<u8>,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

impl CommandOutput {
    /// A successful, silent result.
    pub fn ok() -> Self {
        Self::with_code(0)
    }

    /// A silent result with the given exit code.
    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Default::default()
        }
    }

    /// A result with the given exit code and stderr text.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into().into_bytes(),
        }
    }

    /// True iff the process exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Get stdout as a string
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a string
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// stdout followed by stderr, trimmed, for diagnostics.
    pub fn combined(&self) -> String {
        let stdout = self.stdout_str();
        let stderr = self.stderr_str();
        match (stdout.trim(), stderr.trim()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let spec = ProcessSpec::new("aws");
        assert_eq!(spec.program, "aws");
        assert!(spec.args.is_empty());
        assert!(spec.cwd.is_none());
        assert_eq!(spec.stdio, StdioMode::Capture);
        assert!(spec.inherit_env);
    }

    #[test]
    fn test_builder_chain() {
        let spec = ProcessSpec::new("bash")
            .path_arg(Path::new("/opt/scripts/create_ec2.sh"))
            .args(["--dry-run"])
            .cwd("/opt")
            .inherit_stdio();

        assert_eq!(spec.args, vec!["/opt/scripts/create_ec2.sh", "--dry-run"]);
        assert_eq!(spec.cwd.as_deref(), Some(Path::new("/opt")));
        assert_eq!(spec.stdio, StdioMode::Inherit);
    }

    #[test]
    fn test_display_quotes_when_needed() {
        let spec = ProcessSpec::new("aws")
            .args(["s3", "cp", "/tmp/my state.json", ""])
            .arg("it's");
        assert_eq!(
            spec.display(),
            r"aws s3 cp '/tmp/my state.json' '' 'it'\''s'"
        );
    }

    #[test]
    fn test_output_success() {
        assert!(CommandOutput::ok().success());
        assert!(!CommandOutput::with_code(1).success());
        assert!(!CommandOutput::default().success());
    }

    #[test]
    fn test_output_combined() {
        let out = CommandOutput {
            code: Some(1),
            stdout: b"download failed\n".to_vec(),
            stderr: b"  An error occurred (403)  ".to_vec(),
        };
        assert_eq!(out.combined(), "download failed\nAn error occurred (403)");

        let only_err = CommandOutput::failed(2, "fatal error\n");
        assert_eq!(only_err.combined(), "fatal error");
        assert_eq!(CommandOutput::ok().combined(), "");
    }
}
