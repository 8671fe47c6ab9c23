use std::{fs, path::Path};

use anyhow::{Context, Result, bail};

use super::{CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, Config, default_config_json};
use crate::core::EXAMPLE_DEFINITIONS;

/// Write `.flavorgenrc.json`, plus starter definitions when none exist yet.
pub fn init() -> Result<CommandResult> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(config_path, format!("{}\n", default_config_json()?))
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    let definitions = Config::default().definitions;
    let definitions_path = Path::new(&definitions);
    let definitions_created = !definitions_path.exists();
    if definitions_created {
        fs::write(definitions_path, EXAMPLE_DEFINITIONS)
            .with_context(|| format!("Failed to write {}", definitions))?;
    }

    Ok(CommandResult::new(CommandSummary::Init(InitSummary {
        created: true,
        definitions: definitions_created.then_some(definitions),
    })))
}
