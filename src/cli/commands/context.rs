use std::{env, path::PathBuf};

use anyhow::{Context as _, Result};

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config, resolve_path},
    core::{Definitions, VariantGraph},
};

/// Loaded inputs shared by commands that work on the key definitions.
///
/// Relative paths from the config file are resolved against `root`, the
/// directory holding `.flavorgenrc.json` (or the working directory when
/// running on defaults). Generated files are written below `root` too.
pub struct GenerateContext {
    pub config: Config,
    pub root: PathBuf,
    pub definitions: Definitions,
    pub graph: VariantGraph,
    pub verbose: bool,
}

impl GenerateContext {
    pub fn new(args: &CommonArgs) -> Result<Self> {
        let cwd = env::current_dir().context("Failed to read working directory")?;
        let config_result = load_config(&cwd)?;

        if args.verbose && !config_result.from_file {
            eprintln!("Note: No .flavorgenrc.json found, using default configuration");
        }

        let config = config_result.config;
        let root = config_result.root;

        let definitions_path = match &args.definitions {
            Some(path) => cwd.join(path),
            None => resolve_path(&root, &config.definitions)
                .context("Failed to resolve 'definitions' path")?,
        };
        let definitions = Definitions::load(&definitions_path)?;
        let graph = definitions
            .variant_graph()
            .with_context(|| format!("Invalid brands/builds in {}", definitions_path.display()))?;

        for (key, variant) in definitions.unknown_override_variants(&graph) {
            tracing::warn!(key = %key, "override for unknown variant '{}' is ignored", variant);
        }
        tracing::debug!(
            keys = definitions.keys.len(),
            variants = graph.len(),
            path = %definitions_path.display(),
            "loaded definitions"
        );

        Ok(Self {
            config,
            root,
            definitions,
            graph,
            verbose: args.verbose,
        })
    }
}
