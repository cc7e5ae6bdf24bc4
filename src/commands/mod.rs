// Resource lifecycle
pub mod cleanup;
pub mod create;
pub mod plan;

// Inspection and interaction
pub mod interactive;
pub mod status;

// Remote state backend
pub mod state;

use crate::Context;
use crate::cli::ResourceTarget;
use crate::runner::scripts;
use crate::ui;

/// Script for a single-resource target; `None` for [`ResourceTarget::All`].
pub fn script_for(target: ResourceTarget) -> Option<&'static str> {
    match target {
        ResourceTarget::Sg => Some(scripts::SECURITY_GROUP),
        ResourceTarget::Ec2 => Some(scripts::EC2),
        ResourceTarget::S3 => Some(scripts::S3_BUCKET),
        ResourceTarget::All => None,
    }
}

/// Check AWS credentials, telling the user how to fix them when missing.
pub fn require_credentials(ctx: &Context) -> bool {
    if ctx.has_credentials() {
        return true;
    }

    ui::error("AWS credentials not configured!");
    ui::dim("Please run 'aws configure' first.");
    false
}
