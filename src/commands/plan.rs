use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::cli::ResourceTarget;
use crate::commands::{require_credentials, script_for};
use crate::orchestrator::{self, Orchestrator};
use crate::runner::DRY_RUN_FLAG;
use crate::ui;

/// `plan -r <target>`: run the creation scripts in dry-run mode
pub fn run(ctx: &Context, target: ResourceTarget) -> Result<()> {
    println!("{}", "🔍 Generating execution plan...".cyan().bold());
    println!();

    if !require_credentials(ctx) {
        return Ok(());
    }

    let invoker = ctx.invoker();

    match script_for(target) {
        Some(script) => {
            invoker.execute(script, &[DRY_RUN_FLAG]);
        }
        None => {
            let outcome = Orchestrator::new(&invoker).run_sequence(&orchestrator::plan_all());
            if outcome.is_success() {
                println!();
                ui::success("Plan generation complete.");
            }
        }
    }

    Ok(())
}
