//! Dispatch to the command handler for the parsed arguments.
//!
//! # Returns
//! - `Ok(CommandResult)` with the command summary and collected diagnostics
//! - `Err` if the command fails (missing definitions, required input not
//!   provided, unwritable files, ...)
use super::{
    args::{Arguments, Command},
    commands::CommandResult,
    commands::{generate::generate, init::init, variants::variants},
};
use anyhow::Result;

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Generate(cmd)) => generate(cmd),
        Some(Command::Variants(cmd)) => variants(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
