//! Report formatting and printing utilities.
//!
//! Separate from core logic so the engine can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{
    CommandResult, CommandSummary, GenerateSummary, InitSummary, VariantsSummary,
};
use crate::config::CONFIG_FILE_NAME;
use crate::core::Variant;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Explain the prompt conventions before the first question.
pub fn print_banner() {
    print_banner_to(&mut io::stdout().lock());
}

pub fn print_banner_to<W: Write>(writer: &mut W) {
    let _ = writeln!(
        writer,
        "{}",
        "Enter configuration values. Values in [] are defaults.".bold()
    );
    let _ = writeln!(
        writer,
        "Entries marked with {} have to be non-empty.",
        "(required)".yellow()
    );
    let _ = writeln!(
        writer,
        "Entering no value when there's no default and no {} marking skips overriding the value at the displayed level.",
        "(required)".yellow()
    );
    let _ = writeln!(writer);
}

pub fn print(result: &CommandResult, verbose: bool) {
    let stdout = &mut io::stdout().lock();
    match &result.summary {
        CommandSummary::Generate(summary) => print_generate_to(summary, verbose, stdout),
        CommandSummary::Variants(summary) => print_variants_to(summary, stdout),
        CommandSummary::Init(summary) => print_init_to(summary, stdout),
    }
    print_problems_to(result, &mut io::stderr().lock());
}

fn print_generate_to<W: Write>(summary: &GenerateSummary, verbose: bool, writer: &mut W) {
    if summary.is_dry_run {
        for document in &summary.documents {
            let _ = writeln!(
                writer,
                "{} {}",
                "==>".blue().bold(),
                document.path.display()
            );
            let _ = write!(writer, "{}", document.content);
        }
    } else {
        for path in &summary.written {
            let _ = writeln!(writer, "Written {}.", path.display());
        }
    }

    if verbose {
        let _ = writeln!(
            writer,
            "{} variant(s) inherit everything, {} secret(s) cached",
            summary.skipped_variant_count, summary.cached_secret_count
        );
    }

    let count = summary.documents.len();
    let action = if summary.is_dry_run {
        "Rendered"
    } else {
        "Generated"
    };
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "{} {} resource {}",
            action,
            count,
            if count == 1 { "file" } else { "files" }
        )
        .green()
    );
}

fn print_variants_to<W: Write>(summary: &VariantsSummary, writer: &mut W) {
    let width = summary
        .variants
        .iter()
        .map(|v| v.name.len())
        .max()
        .unwrap_or(0);

    for variant in &summary.variants {
        let _ = writeln!(
            writer,
            "{:<width$}  {:<10}  {}",
            variant.name.bold(),
            variant.level.as_str().cyan(),
            format_parents(variant).dimmed(),
            width = width
        );
    }
}

fn format_parents(variant: &Variant) -> String {
    if variant.parents.is_empty() {
        "-".to_string()
    } else {
        format!("<- {}", variant.parents.join(", "))
    }
}

fn print_init_to<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
    if let Some(definitions) = &summary.definitions {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", definitions).green()
        );
    }
}

/// Totals only; each diagnostic has already been logged when it was found.
fn print_problems_to<W: Write>(result: &CommandResult, writer: &mut W) {
    let errors = result.error_count();
    let warnings = result.warning_count();
    if errors + warnings == 0 {
        return;
    }

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        errors + warnings,
        errors,
        if errors == 1 { "error" } else { "errors" }.red(),
        warnings,
        if warnings == 1 { "warning" } else { "warnings" }.yellow()
    );
}
