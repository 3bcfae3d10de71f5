//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;
use vaultplan_common::NodeFacts;

use crate::domain::{Catalog, InstallationPlan};
use crate::output::{Artifact, OutputContext};

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("vaultplan {version}");
    }

    /// Render the installation summary and the declared resources.
    pub fn render_catalog(&self, catalog: &Catalog) {
        if self.ctx.quiet {
            return;
        }
        let plan = &catalog.plan;

        self.ctx.header("Installation:");
        for (key, value) in plan_rows(plan) {
            self.ctx.kv(key, &value);
        }

        println!();
        self.ctx.header("Resources:");
        for (kind, title) in catalog.summary() {
            println!("  {:<16} {title}", kind.style(self.ctx.styles.kind));
        }

        println!();
        if catalog.document.is_empty() {
            self.ctx.info("Configuration document is empty");
        } else {
            let keys: Vec<&str> = catalog.document.keys().collect();
            self.ctx
                .info(&format!("Configuration keys: {}", keys.join(", ")));
        }
        if let Some(descriptor) = &catalog.service_file {
            self.ctx.info(&format!(
                "{} descriptor {} ({})",
                descriptor.provider,
                descriptor.path,
                short_digest(&descriptor.digest())
            ));
        }
        self.ctx
            .success(&format!("{} resources declared", catalog.summary().len()));
    }

    /// Print the artifact content verbatim.
    ///
    /// Printed even when `quiet`; the content is written byte-exact.
    pub fn render_artifact(&self, artifact: &Artifact<'_>) {
        print!("{}", artifact.content);
    }

    /// Render node facts.
    pub fn render_facts(&self, facts: &NodeFacts) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header("Node facts:");
        for (key, value) in fact_rows(facts) {
            self.ctx.kv(key, &value);
        }
    }
}

/// `(label, value)` rows describing the resolved installation.
#[must_use]
pub fn plan_rows(plan: &InstallationPlan) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("OS family:", plan.os_family().to_string()),
        ("Method:", plan.method().to_string()),
        ("Version:", plan.version().to_string()),
        ("Binary:", plan.binary_path().to_string()),
        ("Config:", plan.config_path().to_string()),
        ("Service:", plan.service().provider.to_string()),
        ("GOMAXPROCS:", plan.service().num_procs.to_string()),
    ];
    if let Some(url) = plan.download_url() {
        rows.insert(3, ("Download:", url.to_string()));
    }
    if let Some(grant) = plan.capability_grant() {
        rows.push(("Capability:", grant.file_capability()));
    }
    rows
}

/// `(label, value)` rows describing node facts.
#[must_use]
pub fn fact_rows(facts: &NodeFacts) -> Vec<(&'static str, String)> {
    vec![
        ("OS family:", facts.os_family.to_string()),
        (
            "Release:",
            facts
                .os_release_major
                .map_or_else(|| "(unknown)".to_string(), |v| v.to_string()),
        ),
        ("Kernel:", facts.kernel.clone()),
        ("Architecture:", facts.architecture.clone()),
        (
            "Processors:",
            if facts.processor_count == 0 {
                "(unknown)".to_string()
            } else {
                facts.processor_count.to_string()
            },
        ),
        (
            "Service:",
            facts
                .service_provider
                .map_or_else(|| "(undetected)".to_string(), |p| p.to_string()),
        ),
    ]
}

/// First 12 hex digits of a digest.
#[must_use]
pub fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}
