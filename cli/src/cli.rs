//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;

/// Resolve a Vault node's desired state into installation, configuration and service artifacts
#[derive(Parser)]
#[command(
    name = "vaultplan",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve the node and list the resources to declare
    Resolve(commands::InputArgs),

    /// Print a generated artifact
    #[command(subcommand)]
    Render(commands::render::RenderCommand),

    /// Show the node facts used for resolution
    Facts(commands::InputArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub fn run(self) -> Result<ExitCode> {
        let Cli {
            no_color,
            quiet,
            json,
            command,
        } = self;
        let app = AppContext::new(&OutputFlags {
            no_color,
            quiet,
            json,
        })?;
        match command {
            Command::Resolve(args) => commands::resolve::run(&app, &args),
            Command::Render(cmd) => commands::render::run(&app, &cmd),
            Command::Facts(args) => commands::facts::run(&app, &args),
            Command::Version => commands::version::run(&app),
        }
    }
}
