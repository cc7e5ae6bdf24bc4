//! A scriptable [`ProcessRunner`] for tests.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::runner::ProcessRunner;
use crate::spec::{CommandOutput, ProcessSpec};

type Responder = Arc<dyn Fn(&ProcessSpec) -> Result<CommandOutput> + Send + Sync>;

#[derive(Default)]
struct Inner {
    calls: Vec<ProcessSpec>,
    rules: Vec<(String, Responder)>,
}

/// Fake runner that records every spec and answers from registered rules.
///
/// Rules match when the rendered command line ([`ProcessSpec::display`])
/// contains the rule's needle. The first matching rule wins; with no match
/// the process "succeeds" silently. Clones share the same recording, so a
/// test can hand one clone to the code under test and inspect the other.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedRunner {
    /// A runner where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking test thread must not hide the recording from others
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Answer commands containing `needle` with a fixed output.
    pub fn respond(self, needle: impl Into<String>, output: CommandOutput) -> Self {
        self.handle(needle, move |_| Ok(output.clone()))
    }

    /// Answer commands containing `needle` with the given exit code.
    pub fn exit_code(self, needle: impl Into<String>, code: i32) -> Self {
        self.respond(needle, CommandOutput::with_code(code))
    }

    /// Make commands containing `needle` fail to spawn as if missing.
    pub fn missing(self, needle: impl Into<String>) -> Self {
        self.handle(needle, |spec| Err(Error::ProgramNotFound(spec.program.clone())))
    }

    /// Answer commands containing `needle` by calling `f`.
    ///
    /// Useful when the fake must also simulate a side effect, such as a copy
    /// command writing its destination file.
    pub fn handle<F>(self, needle: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ProcessSpec) -> Result<CommandOutput> + Send + Sync + 'static,
    {
        self.lock().rules.push((needle.into(), Arc::new(f)));
        self
    }

    /// Every spec run so far, in order.
    pub fn calls(&self) -> Vec<ProcessSpec> {
        self.lock().calls.clone()
    }

    /// Number of specs run so far.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Rendered command lines run so far, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.lock().calls.iter().map(ProcessSpec::display).collect()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, spec: &ProcessSpec) -> Result<CommandOutput> {
        let responder = {
            let mut inner = self.lock();
            inner.calls.push(spec.clone());
            let line = spec.display();
            inner
                .rules
                .iter()
                .find(|(needle, _)| line.contains(needle.as_str()))
                .map(|(_, r)| Arc::clone(r))
        };

        match responder {
            Some(r) => r(spec),
            None => Ok(CommandOutput::ok()),
        }
    }
}

impl std::fmt::Debug for ScriptedRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ScriptedRunner")
            .field("calls", &inner.calls.len())
            .field("rules", &inner.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_success_and_recording() {
        let runner = ScriptedRunner::new();
        let probe = runner.clone();

        let out = runner.run(&ProcessSpec::new("aws").arg("--version")).unwrap();
        assert!(out.success());
        assert_eq!(probe.call_count(), 1);
        assert_eq!(probe.command_lines(), vec!["aws --version"]);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let runner = ScriptedRunner::new()
            .exit_code("create_ec2.sh", 1)
            .exit_code(".sh", 7);

        let ec2 = ProcessSpec::new("bash").arg("scripts/create_ec2.sh");
        let sg = ProcessSpec::new("bash").arg("scripts/create_security_group.sh");

        assert_eq!(runner.run(&ec2).unwrap().code, Some(1));
        assert_eq!(runner.run(&sg).unwrap().code, Some(7));
    }

    #[test]
    fn test_missing_program() {
        let runner = ScriptedRunner::new().missing("aws");
        let err = runner.run(&ProcessSpec::new("aws")).unwrap_err();
        assert!(err.is_not_found());
        assert!(!runner.succeeds(&ProcessSpec::new("aws")));
        assert_eq!(runner.call_count(), 2);
    }

    #[test]
    fn test_handler_side_effect() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = tmp.path().join("out.txt");

        let runner = ScriptedRunner::new().handle("cp", |spec| {
            std::fs::write(&spec.args[1], "copied").unwrap();
            Ok(CommandOutput::ok())
        });

        runner
            .run(&ProcessSpec::new("cp").arg("src").path_arg(&target))
            .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "copied");
    }
}
