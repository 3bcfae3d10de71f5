//! `vaultplan facts` — show the facts resolution would run against.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::commands::InputArgs;

/// Run the facts command.
///
/// # Errors
///
/// Returns an error if the facts cannot be gathered.
pub fn run(app: &AppContext, args: &InputArgs) -> Result<ExitCode> {
    let facts = args.facts(app)?;
    app.renderer().render_facts(&facts)?;
    Ok(ExitCode::SUCCESS)
}
