use anyhow::{Context as _, Result};

use super::super::args::GenerateCommand;
use super::super::report;
use super::context::GenerateContext;
use super::{CommandResult, CommandSummary, GenerateSummary};
use crate::config::{resolve_path, validate_output_pattern};
use crate::core::{
    CacheLoad, SecretCache, TerminalSource, XmlResourceSink, compact, render::write_documents,
    render_all, resolve,
};

/// Resolve, compact and render all variants.
///
/// Nothing is written until every value has been resolved: an `InputRequired`
/// failure leaves the secret cache and the resource files untouched.
pub fn generate(cmd: GenerateCommand) -> Result<CommandResult> {
    let args = cmd.args;
    let ctx = GenerateContext::new(&args.common)?;

    let output_pattern = args
        .output_pattern
        .unwrap_or_else(|| ctx.config.output_pattern.clone());
    validate_output_pattern(&output_pattern)?;

    let secrets_path = match args.secrets_file {
        Some(path) => path,
        None => resolve_path(&ctx.root, &ctx.config.secrets_file)
            .context("Failed to resolve 'secretsFile' path")?,
    };

    let mut diagnostics = Vec::new();
    let CacheLoad { mut cache, warning } = SecretCache::load(&secrets_path);
    if let Some(warning) = warning {
        tracing::warn!("{}, starting with an empty cache", warning);
        diagnostics.push(warning);
    }

    report::print_banner();

    let mut source = TerminalSource::stdio();
    let resolved = resolve(
        &ctx.definitions.keys,
        &ctx.graph,
        &mut source,
        &mut cache,
        ctx.config.max_attempts,
    )?;

    if !args.dry_run {
        cache
            .save(&secrets_path)
            .context("Failed to persist secret cache")?;
    }

    let compaction = compact(&resolved, &ctx.graph);
    diagnostics.extend(compaction.diagnostics);

    let sink = XmlResourceSink::new(&output_pattern);
    let rendering = render_all(&compaction.config, &ctx.definitions, &sink);
    diagnostics.extend(rendering.diagnostics);

    let written = if args.dry_run {
        Vec::new()
    } else {
        write_documents(&rendering.documents, &ctx.root)?
    };

    Ok(CommandResult {
        summary: CommandSummary::Generate(GenerateSummary {
            skipped_variant_count: ctx.graph.len() - compaction.config.len(),
            documents: rendering.documents,
            written,
            is_dry_run: args.dry_run,
            cached_secret_count: cache.len(),
        }),
        diagnostics,
    })
}
