mod cli;
mod commands;
mod config;
mod credentials;
mod orchestrator;
mod runner;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use execkit::{ProcessRunner, SystemRunner};
use statekit::StateTracker;
use std::io;
use std::sync::Arc;

use crate::config::Settings;
use crate::runner::ScriptInvoker;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub settings: Settings,
    pub runner: Arc<dyn ProcessRunner>,
}

impl Context {
    pub fn new(settings: Settings, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            verbose: 0,
            quiet: false,
            settings,
            runner,
        }
    }

    /// Script invoker bound to this context's settings and runner
    pub fn invoker(&self) -> ScriptInvoker<'_> {
        ScriptInvoker::new(&self.settings, self.runner.as_ref())
    }

    /// State tracker for the project's state file
    pub fn tracker(&self) -> StateTracker {
        StateTracker::new(
            &self.settings.state_file,
            self.settings.remote.clone(),
            Box::new(Arc::clone(&self.runner)),
        )
    }

    /// Run the AWS identity check
    pub fn has_credentials(&self) -> bool {
        credentials::check_credentials(self.runner.as_ref())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "aws-automator", &mut io::stdout());
        return Ok(());
    }

    let mut ctx = Context::new(Settings::resolve()?, Arc::new(SystemRunner));
    ctx.verbose = cli.verbose;
    ctx.quiet = cli.quiet;

    match cli.command {
        Command::Create(args) => commands::create::run(&ctx, args.resource),
        Command::Auto => commands::create::auto(&ctx),
        Command::Plan(args) => commands::plan::run(&ctx, args.resource),
        Command::Cleanup { yes } => commands::cleanup::run(&ctx, yes),
        Command::Status => commands::status::run(&ctx),
        Command::Interactive => commands::interactive::run(&ctx),
        Command::State(cmd) => commands::state::run(&ctx, cmd),
        Command::Completions { .. } => Ok(()),
    }
}
