//! Application context — unified state passed to every command handler.
//!
//! Built once in `Cli::run()` from the global flags and the `VAULTPLAN_*`
//! environment, then passed as `&AppContext` to each command.

use anyhow::Result;

use crate::infra::settings::Settings;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Input locations from the environment; flags overlay these.
    pub settings: Settings,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a `VAULTPLAN_*` variable is malformed.
    pub fn new(flags: &OutputFlags) -> Result<Self> {
        Ok(Self::with_settings(flags, Settings::from_env()?))
    }

    /// Construct an `AppContext` with explicit settings.
    #[must_use]
    pub fn with_settings(flags: &OutputFlags, settings: Settings) -> Self {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            mode,
            settings,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }
}
