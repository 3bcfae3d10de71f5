//! Output formatting module

pub mod human;
pub mod json;
pub mod styles;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use json::JsonRenderer;
use serde::Serialize;
pub use styles::Styles;
use vaultplan_common::NodeFacts;

use crate::domain::Catalog;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠` to stderr. Suppressed when `quiet`.
    ///
    /// Goes to stderr so rendered artifacts on stdout stay byte-exact.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            eprintln!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<20} {value}", key.style(self.styles.dim));
        }
    }
}

/// A rendered file plus the metadata it is written with.
#[derive(Debug, Serialize)]
pub struct Artifact<'a> {
    pub path: &'a str,
    pub owner: &'a str,
    pub group: &'a str,
    pub mode: &'a str,
    pub digest: String,
    pub content: &'a str,
}

/// Renderer selected by the global `--json` flag.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render a resolved catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_catalog(&self, catalog: &Catalog) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_catalog(catalog);
                Ok(())
            }
            Self::Json(r) => r.render_catalog(catalog),
        }
    }

    /// Render node facts.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_facts(&self, facts: &NodeFacts) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_facts(facts);
                Ok(())
            }
            Self::Json(r) => r.render_facts(facts),
        }
    }

    /// Render a single file artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_artifact(&self, artifact: &Artifact<'_>) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_artifact(artifact);
                Ok(())
            }
            Self::Json(r) => r.render_artifact(artifact),
        }
    }

    /// Render the tool version.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Self::Json(r) => r.render_version(version),
        }
    }
}
