use anyhow::Result;
use colored::Colorize;
use statekit::{PullOutcome, RemoteStateConfig, remote};

use crate::Context;
use crate::cli::StateCommand;
use crate::runner::scripts;
use crate::ui;

pub fn run(ctx: &Context, cmd: StateCommand) -> Result<()> {
    match cmd {
        StateCommand::Init { bucket, region } => init(ctx, &bucket, region.as_deref()),
        StateCommand::Pull => pull(ctx),
        StateCommand::Push => push(ctx),
        StateCommand::Show => show(ctx),
    }
}

/// Arguments for `init_state.sh`
pub fn init_args<'a>(bucket: &'a str, region: Option<&'a str>) -> Vec<&'a str> {
    let mut args = vec!["--bucket", bucket];
    if let Some(region) = region.filter(|r| !r.is_empty()) {
        args.extend(["--region", region]);
    }
    args
}

fn init(ctx: &Context, bucket: &str, region: Option<&str>) -> Result<()> {
    println!("{}", "🪣 Initializing S3 state bucket...".cyan().bold());

    if ctx.invoker().execute(scripts::INIT_STATE, &init_args(bucket, region)) {
        ui::success(&format!("State bucket {bucket} is ready"));
        if ctx.settings.remote.as_ref().map(|r| r.bucket.as_str()) != Some(bucket) {
            ui::dim(&format!("Set {}={} in your .env file to use it", remote::ENV_BUCKET, bucket));
        }
    }
    Ok(())
}

fn pull(ctx: &Context) -> Result<()> {
    if !ctx.settings.is_remote_enabled() {
        print_disabled_notice();
        return Ok(());
    }

    let tracker = ctx.tracker();
    if let Some(remote) = tracker.remote() {
        println!("📥 Pulling state from {}...", remote.uri());
    }

    match tracker.pull() {
        Ok(PullOutcome::Pulled) => ui::success("State pulled successfully"),
        Ok(PullOutcome::NotFound) => ui::info("No remote state found (first run)"),
        Ok(PullOutcome::Disabled) => print_disabled_notice(),
        Err(e) => ui::error(&format!("Failed to pull state: {e}")),
    }
    Ok(())
}

fn push(ctx: &Context) -> Result<()> {
    if !ctx.settings.is_remote_enabled() {
        print_disabled_notice();
        return Ok(());
    }

    let tracker = ctx.tracker();
    if let Some(remote) = tracker.remote() {
        println!("📤 Pushing state to {}...", remote.uri());
    }

    match tracker.push() {
        Ok(()) => ui::success("State pushed successfully"),
        Err(e) => ui::error(&format!("Failed to push state: {e}")),
    }
    Ok(())
}

fn show(ctx: &Context) -> Result<()> {
    ui::section("🔧 Remote State Configuration");
    println!();

    match &ctx.settings.remote {
        Some(remote) => {
            println!("{}", "Status: ✅ Enabled".green().bold());
            for (key, value) in describe(remote) {
                ui::kv(key, &value);
            }
        }
        None => {
            println!("{}", "Status: ⚠️  Disabled (local state only)".yellow().bold());
            println!();
            println!("To enable remote state, add to your .env file:");
            println!("  {}=your-bucket-name", remote::ENV_BUCKET);
            println!("  {}={}", remote::ENV_KEY, remote::DEFAULT_KEY);
            println!("  {}={}", remote::ENV_REGION, remote::DEFAULT_REGION);
        }
    }
    Ok(())
}

/// Labelled fields of an enabled remote configuration
pub fn describe(remote: &RemoteStateConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Bucket", remote.bucket.clone()),
        ("Key", remote.key.clone()),
        ("Region", remote.region.clone()),
        ("S3 URI", remote.uri()),
    ]
}

fn print_disabled_notice() {
    ui::warn("Remote state is not configured.");
    println!();
    println!(
        "To enable remote state, set {} in your .env file:",
        remote::ENV_BUCKET
    );
    println!("  {}=your-bucket-name", remote::ENV_BUCKET);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use execkit::{CommandOutput, ScriptedRunner};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn remote_config() -> Option<RemoteStateConfig> {
        RemoteStateConfig::from_lookup(|name| match name {
            "S3_STATE_BUCKET" => Some("my-state".to_string()),
            "AWS_REGION" => Some("eu-north-1".to_string()),
            _ => None,
        })
    }

    #[test]
    fn test_init_args() {
        assert_eq!(init_args("b", None), vec!["--bucket", "b"]);
        assert_eq!(init_args("b", Some("")), vec!["--bucket", "b"]);
        assert_eq!(
            init_args("b", Some("us-west-2")),
            vec!["--bucket", "b", "--region", "us-west-2"]
        );
    }

    #[test]
    fn test_describe() {
        let fields = describe(&remote_config().unwrap());
        assert_eq!(
            fields,
            vec![
                ("Bucket", "my-state".to_string()),
                ("Key", "state/created_resources.json".to_string()),
                ("Region", "eu-north-1".to_string()),
                ("S3 URI", "s3://my-state/state/created_resources.json".to_string()),
            ]
        );
    }

    #[test]
    fn test_pull_and_push_disabled_run_nothing() {
        let tmp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let ctx = Context::new(Settings::for_root(tmp.path(), None), Arc::new(runner.clone()));

        run(&ctx, StateCommand::Pull).unwrap();
        run(&ctx, StateCommand::Push).unwrap();
        run(&ctx, StateCommand::Show).unwrap();
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_push_without_local_file_is_reported() {
        let tmp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let ctx = Context::new(
            Settings::for_root(tmp.path(), remote_config()),
            Arc::new(runner.clone()),
        );

        run(&ctx, StateCommand::Push).unwrap();
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_pull_failure_does_not_abort() {
        let tmp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .respond("s3://my-state", CommandOutput::failed(255, "Connect timeout"));
        let ctx = Context::new(
            Settings::for_root(tmp.path(), remote_config()),
            Arc::new(runner.clone()),
        );

        assert!(run(&ctx, StateCommand::Pull).is_ok());
        assert_eq!(runner.call_count(), 1);
        assert!(runner.command_lines()[0].ends_with("--region eu-north-1"));
    }

    #[test]
    fn test_init_runs_script() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::for_root(tmp.path(), None);
        std::fs::create_dir_all(&settings.scripts_dir).unwrap();
        std::fs::write(settings.scripts_dir.join(scripts::INIT_STATE), "").unwrap();
        let runner = ScriptedRunner::new();
        let ctx = Context::new(settings, Arc::new(runner.clone()));

        run(
            &ctx,
            StateCommand::Init {
                bucket: "tf-state".to_string(),
                region: Some("us-east-2".to_string()),
            },
        )
        .unwrap();
        assert!(runner.command_lines()[0].ends_with("init_state.sh --bucket tf-state --region us-east-2"));
    }
}
