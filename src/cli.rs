use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "aws-automator")]
#[command(version)]
#[command(about = "Automate AWS resource creation with Bash scripts")]
#[command(
    long_about = "A CLI tool to orchestrate AWS resource creation scripts for EC2, S3, and Security Groups."
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create AWS resources
    Create(ResourceArgs),

    /// Cleanup all created AWS resources
    Cleanup {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show status of created resources
    Status,

    /// Interactive mode to select resources to create
    Interactive,

    /// Automatically create all resources in order
    Auto,

    /// Preview AWS resource creation (dry run)
    Plan(ResourceArgs),

    /// Manage remote state backend
    #[command(subcommand)]
    State(StateCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct ResourceArgs {
    /// Resource to act on
    #[arg(short, long, value_enum, default_value_t = ResourceTarget::All)]
    pub resource: ResourceTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResourceTarget {
    /// Security group (SSH + HTTP)
    Sg,
    /// EC2 instance with SSH key pair
    Ec2,
    /// S3 bucket
    S3,
    /// Everything, in dependency order
    All,
}

// ============================================================================
// State Commands
// ============================================================================

#[derive(Subcommand)]
pub enum StateCommand {
    /// Initialize S3 state bucket
    Init {
        /// S3 bucket name
        #[arg(short, long)]
        bucket: String,

        /// AWS region
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Pull state from S3 to local
    Pull,

    /// Push local state to S3
    Push,

    /// Show remote state configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_defaults_to_all() {
        let cli = Cli::try_parse_from(["aws-automator", "create"]).unwrap();
        match cli.command {
            Command::Create(args) => assert_eq!(args.resource, ResourceTarget::All),
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_plan_resource_flag() {
        let cli = Cli::try_parse_from(["aws-automator", "plan", "-r", "ec2"]).unwrap();
        match cli.command {
            Command::Plan(args) => assert_eq!(args.resource, ResourceTarget::Ec2),
            _ => panic!("expected plan"),
        }
        assert!(Cli::try_parse_from(["aws-automator", "plan", "-r", "rds"]).is_err());
    }

    #[test]
    fn test_state_init_requires_bucket() {
        assert!(Cli::try_parse_from(["aws-automator", "state", "init"]).is_err());

        let cli = Cli::try_parse_from([
            "aws-automator",
            "-v",
            "state",
            "init",
            "--bucket",
            "tf-state",
            "--region",
            "eu-west-1",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::State(StateCommand::Init { bucket, region }) => {
                assert_eq!(bucket, "tf-state");
                assert_eq!(region.as_deref(), Some("eu-west-1"));
            }
            _ => panic!("expected state init"),
        }
    }
}
