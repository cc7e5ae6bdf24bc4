use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::cli::ResourceTarget;
use crate::commands::{require_credentials, script_for, status};
use crate::orchestrator::{self, Orchestrator, SequenceOutcome};
use crate::ui;

/// `create -r <target>`
pub fn run(ctx: &Context, target: ResourceTarget) -> Result<()> {
    let Some(script) = script_for(target) else {
        return auto(ctx);
    };

    if !require_credentials(ctx) {
        return Ok(());
    }

    if ctx.invoker().execute(script, &[]) {
        ui::success(&format!("{script} completed"));
    }
    Ok(())
}

/// `auto`: create every resource in order, then show status
pub fn auto(ctx: &Context) -> Result<()> {
    println!();
    println!("{}", "🚀 Starting automated AWS resource creation...".cyan().bold());

    if !require_credentials(ctx) {
        return Ok(());
    }

    let invoker = ctx.invoker();
    let outcome = Orchestrator::new(&invoker).run_sequence(&orchestrator::create_all());

    match outcome {
        SequenceOutcome::Completed { .. } => {
            println!();
            ui::success("All resources created successfully!");
            status::run(ctx)
        }
        SequenceOutcome::Aborted { step, .. } => {
            log::info!("Sequence aborted at {step}");
            Ok(())
        }
    }
}
