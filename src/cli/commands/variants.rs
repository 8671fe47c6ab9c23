use anyhow::Result;

use super::super::args::VariantsCommand;
use super::context::GenerateContext;
use super::{CommandResult, CommandSummary, VariantsSummary};

pub fn variants(cmd: VariantsCommand) -> Result<CommandResult> {
    let ctx = GenerateContext::new(&cmd.common)?;
    let variants = ctx.graph.iter().cloned().collect();

    Ok(CommandResult::new(CommandSummary::Variants(
        VariantsSummary { variants },
    )))
}
