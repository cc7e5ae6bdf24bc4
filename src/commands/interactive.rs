use anyhow::{Context as _, Result};
use colored::Colorize;

use crate::Context;
use crate::cli::ResourceTarget;
use crate::commands::{cleanup, create, require_credentials, status};
use crate::ui;

/// Entries of the interactive menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SecurityGroup,
    Ec2,
    S3Bucket,
    All,
    Status,
    Cleanup,
    Exit,
}

impl Action {
    pub const ALL: [Self; 7] = [
        Self::SecurityGroup,
        Self::Ec2,
        Self::S3Bucket,
        Self::All,
        Self::Status,
        Self::Cleanup,
        Self::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::SecurityGroup => "🔒 Create Security Group (SSH + HTTP)",
            Self::Ec2 => "💻 Create EC2 Instance (Amazon Linux 2)",
            Self::S3Bucket => "🪣 Create S3 Bucket (with versioning)",
            Self::All => "🚀 Create All Resources (Automated)",
            Self::Status => "📊 View Status",
            Self::Cleanup => "🧹 Cleanup All Resources",
            Self::Exit => "🚪 Exit",
        }
    }

    /// Creation target for the resource actions
    pub fn target(self) -> Option<ResourceTarget> {
        match self {
            Self::SecurityGroup => Some(ResourceTarget::Sg),
            Self::Ec2 => Some(ResourceTarget::Ec2),
            Self::S3Bucket => Some(ResourceTarget::S3),
            Self::All => Some(ResourceTarget::All),
            _ => None,
        }
    }
}

/// `interactive`: menu loop until Exit or Esc
pub fn run(ctx: &Context) -> Result<()> {
    if !ctx.quiet {
        ui::banner();
    }

    if !require_credentials(ctx) {
        return Ok(());
    }

    loop {
        println!();
        let action = match select()? {
            Some(action) => action,
            None => Action::Exit,
        };

        if !dispatch(ctx, action)? {
            println!("{}", "👋 Goodbye!".cyan());
            return Ok(());
        }
    }
}

/// Run one menu action. Returns `false` once the loop should stop.
pub fn dispatch(ctx: &Context, action: Action) -> Result<bool> {
    log::debug!("Menu action: {action:?}");

    match action {
        Action::SecurityGroup | Action::Ec2 | Action::S3Bucket | Action::All => {
            if let Some(target) = action.target() {
                create::run(ctx, target)?;
            }
        }
        Action::Status => status::run(ctx)?,
        Action::Cleanup => cleanup::run(ctx, false)?,
        Action::Exit => return Ok(false),
    }
    Ok(true)
}

fn select() -> Result<Option<Action>> {
    let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();

    let choice = dialoguer::Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact_opt()
        .context("Failed to read menu selection")?;

    Ok(choice.and_then(|i| Action::ALL.get(i).copied()))
}
