//! Ordered multi-script sequences ("create all", "plan all").

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::runner::{DRY_RUN_FLAG, ScriptInvoker, scripts};
use crate::ui;

/// Pause between real creation steps so the previous resource becomes
/// usable (e.g. a fresh security group) before the next script needs it.
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// One script in a sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: &'static str,
    pub script: &'static str,
    pub emoji: &'static str,
    pub dry_run: bool,
}

impl Step {
    pub const fn new(name: &'static str, script: &'static str, emoji: &'static str) -> Self {
        Self {
            name,
            script,
            emoji,
            dry_run: false,
        }
    }

    /// The same step, run with `--dry-run`
    pub fn planned(mut self) -> Self {
        self.dry_run = true;
        self
    }

    fn verb(&self) -> &'static str {
        if self.dry_run { "Planning" } else { "Creating" }
    }
}

pub const SECURITY_GROUP: Step = Step::new(
    "Firewall Rules (Security Group)",
    scripts::SECURITY_GROUP,
    "🛡️ ",
);
pub const EC2: Step = Step::new("SSH Key & EC2 Instance", scripts::EC2, "🖥️ ");
pub const S3_BUCKET: Step = Step::new("S3 Bucket", scripts::S3_BUCKET, "🪣");

/// Security group → EC2 instance (with key pair) → S3 bucket
pub fn create_all() -> Vec<Step> {
    vec![SECURITY_GROUP, EC2, S3_BUCKET]
}

/// [`create_all`] as a dry run
pub fn plan_all() -> Vec<Step> {
    create_all().into_iter().map(Step::planned).collect()
}

/// How a sequence ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// Every step succeeded
    Completed { steps: usize },
    /// `step` (0-based `index`) failed; later steps were not run
    Aborted { step: String, index: usize },
}

impl SequenceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SequenceOutcome::Completed { .. })
    }
}

/// Runs steps one after another, stopping at the first failure.
///
/// Already-created resources are left in place when a later step fails.
pub struct Orchestrator<'a> {
    invoker: &'a ScriptInvoker<'a>,
    settle: Duration,
}

impl<'a> Orchestrator<'a> {
    pub fn new(invoker: &'a ScriptInvoker<'a>) -> Self {
        Self {
            invoker,
            settle: SETTLE_DELAY,
        }
    }

    /// Override the pause between real steps
    #[cfg(test)]
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn run_sequence(&self, steps: &[Step]) -> SequenceOutcome {
        let total = steps.len();

        for (index, step) in steps.iter().enumerate() {
            if index > 0 && !step.dry_run && !steps[index - 1].dry_run {
                self.settle();
            }

            println!();
            ui::step(
                index + 1,
                total,
                &format!("{} {} {}...", step.emoji, step.verb(), step.name),
            );

            let args: &[&str] = if step.dry_run { &[DRY_RUN_FLAG] } else { &[] };
            if !self.invoker.execute(step.script, args) {
                if step.dry_run {
                    ui::error(&format!("Failed to generate plan for {}.", step.name));
                } else {
                    ui::error(&format!("Failed to create {}. Aborting...", step.name));
                }
                return SequenceOutcome::Aborted {
                    step: step.name.to_string(),
                    index,
                };
            }
        }

        SequenceOutcome::Completed { steps: total }
    }

    fn settle(&self) {
        if self.settle.is_zero() {
            return;
        }

        log::debug!("Settling for {:?}", self.settle);
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Waiting for AWS to settle...");
        pb.enable_steady_tick(Duration::from_millis(100));
        std::thread::sleep(self.settle);
        pb.finish_and_clear();
    }
}
