use std::path::PathBuf;

use crate::core::{RenderedDocument, Variant};
use crate::error::{Error, Severity};

#[derive(Debug)]
pub enum CommandSummary {
    Generate(GenerateSummary),
    Variants(VariantsSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct GenerateSummary {
    pub documents: Vec<RenderedDocument>,
    /// Paths written to disk, relative to the project root. Empty on dry runs.
    pub written: Vec<PathBuf>,
    pub is_dry_run: bool,
    /// Number of variants that ended up with nothing to override.
    pub skipped_variant_count: usize,
    pub cached_secret_count: usize,
}

#[derive(Debug)]
pub struct VariantsSummary {
    pub variants: Vec<Variant>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    /// Starter definitions file written alongside the config, if any.
    pub definitions: Option<String>,
}

/// Result of running flavorgen commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Non-fatal problems collected along the way.
    pub diagnostics: Vec<Error>,
}

impl CommandResult {
    pub fn new(summary: CommandSummary) -> Self {
        Self {
            summary,
            diagnostics: Vec::new(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == severity)
            .count()
    }
}
