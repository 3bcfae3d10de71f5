//! vaultplan — resolve a Vault node's desired state into concrete artifacts

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vaultplan_cli::cli::Cli;
use vaultplan_cli::output::json;

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries rendered artifacts only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VAULTPLAN_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let as_json = cli.json;
    match cli.run() {
        Ok(code) => code,
        Err(e) => {
            report(&e, as_json);
            ExitCode::FAILURE
        }
    }
}

fn report(err: &anyhow::Error, as_json: bool) {
    if as_json {
        match json::format_error(&format!("{err:#}"), json::error_code(err)) {
            Ok(obj) => println!("{obj}"),
            Err(_) => eprintln!("Error: {err:#}"),
        }
    } else {
        eprintln!("Error: {err:#}");
    }
}
