//! `vaultplan resolve` — resolve the node and print the resource catalog.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::commands::InputArgs;

/// Run the resolve command.
///
/// # Errors
///
/// Returns an error if the inputs cannot be loaded or resolution fails.
pub fn run(app: &AppContext, args: &InputArgs) -> Result<ExitCode> {
    let catalog = args.resolve(app)?;
    app.renderer().render_catalog(&catalog)?;
    Ok(ExitCode::SUCCESS)
}
