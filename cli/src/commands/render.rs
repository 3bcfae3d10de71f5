//! `vaultplan render` — print one generated artifact.

use anyhow::Result;
use clap::Subcommand;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::commands::InputArgs;
use crate::output::Artifact;

/// Render subcommands.
#[derive(Subcommand)]
pub enum RenderCommand {
    /// Print the server configuration document
    Config(InputArgs),
    /// Print the service descriptor (systemd unit or init script)
    Service(InputArgs),
}

/// Run the render command.
///
/// An unmanaged artifact is not an error: a notice goes to stderr and the
/// command succeeds with nothing on stdout.
///
/// # Errors
///
/// Returns an error if the inputs cannot be loaded or resolution fails.
pub fn run(app: &AppContext, cmd: &RenderCommand) -> Result<ExitCode> {
    match cmd {
        RenderCommand::Config(args) => render_config(app, args),
        RenderCommand::Service(args) => render_service(app, args),
    }
}

fn render_config(app: &AppContext, args: &InputArgs) -> Result<ExitCode> {
    let catalog = args.resolve(app)?;
    let Some(file) = &catalog.config_file else {
        app.output
            .warn("manage_config_file is false; no configuration file is managed");
        return Ok(ExitCode::SUCCESS);
    };
    let content = file.content.as_deref().unwrap_or_default();
    app.renderer().render_artifact(&Artifact {
        path: &file.path,
        owner: &file.owner,
        group: &file.group,
        mode: &file.mode,
        digest: file.digest().unwrap_or_default(),
        content,
    })?;
    Ok(ExitCode::SUCCESS)
}

fn render_service(app: &AppContext, args: &InputArgs) -> Result<ExitCode> {
    let catalog = args.resolve(app)?;
    let Some(descriptor) = &catalog.service_file else {
        app.output
            .warn("manage_service_file is false; no service descriptor is managed");
        return Ok(ExitCode::SUCCESS);
    };
    app.renderer().render_artifact(&Artifact {
        path: &descriptor.path,
        owner: descriptor.owner,
        group: descriptor.group,
        mode: descriptor.mode,
        digest: descriptor.digest(),
        content: &descriptor.content,
    })?;
    Ok(ExitCode::SUCCESS)
}
