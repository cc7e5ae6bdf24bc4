use anyhow::{Context as _, Result};
use colored::Colorize;

use crate::Context;
use crate::runner::{FORCE_FLAG, scripts};
use crate::ui;

/// `cleanup`: delete every tracked resource via the cleanup script
pub fn run(ctx: &Context, yes: bool) -> Result<()> {
    println!();
    println!(
        "{}",
        "⚠️  WARNING: This will delete all created resources!"
            .yellow()
            .bold()
    );

    if !yes && !confirm()? {
        println!("{}", "Cleanup cancelled.".cyan());
        return Ok(());
    }

    println!();
    println!("{}", "🧹 Cleaning up resources...".cyan().bold());
    cleanup(ctx);
    Ok(())
}

/// Run the cleanup script without prompting. The script's own prompt is
/// skipped with `--force`.
pub fn cleanup(ctx: &Context) -> bool {
    match ctx.invoker().run(scripts::CLEANUP, &[FORCE_FLAG]) {
        Ok(()) => {
            ui::success("Cleanup completed successfully!");
            true
        }
        Err(e) => {
            ui::error(&format!("Cleanup failed: {e}"));
            false
        }
    }
}

fn confirm() -> Result<bool> {
    let confirmed = dialoguer::Confirm::new()
        .with_prompt("Are you sure you want to proceed")
        .default(false)
        .interact_opt()
        .context("Failed to read confirmation")?;

    Ok(confirmed.unwrap_or(false))
}
