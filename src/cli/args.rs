//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `generate`: prompt for values, compact them and write resource files
//! - `variants`: list variants in traversal order
//! - `init`: initialize flavorgen configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Generate(cmd)) => cmd.args.common.verbose,
            Some(Command::Variants(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Key definitions file (overrides config file)
    #[arg(long)]
    pub definitions: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Secret cache file (overrides config file)
    #[arg(long, env = "FLAVORGEN_SECRETS_FILE")]
    pub secrets_file: Option<PathBuf>,

    /// Output path pattern containing {variant} (overrides config file)
    #[arg(long)]
    pub output_pattern: Option<String>,

    /// Print the documents instead of writing them (the secret cache is not saved)
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub args: GenerateArgs,
}

#[derive(Debug, Args)]
pub struct VariantsCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prompt for configuration values and write one resource file per variant
    Generate(GenerateCommand),
    /// List all variants in resolution order with their parents
    Variants(VariantsCommand),
    /// Initialize a new .flavorgenrc.json configuration file
    Init,
}
