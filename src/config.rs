use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::render::{DEFAULT_OUTPUT_PATTERN, VARIANT_PLACEHOLDER};

pub const CONFIG_FILE_NAME: &str = ".flavorgenrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_definitions")]
    pub definitions: String,
    #[serde(default = "default_secrets_file")]
    pub secrets_file: String,
    #[serde(default = "default_output_pattern")]
    pub output_pattern: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_definitions() -> String {
    "config_keys.json".to_string()
}

fn default_secrets_file() -> String {
    "~/.flavorgen_secrets.json".to_string()
}

fn default_output_pattern() -> String {
    DEFAULT_OUTPUT_PATTERN.to_string()
}

fn default_max_attempts() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            definitions: default_definitions(),
            secrets_file: default_secrets_file(),
            output_pattern: default_output_pattern(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        validate_output_pattern(&self.output_pattern)?;
        if self.max_attempts == 0 {
            bail!("'maxAttempts' must be at least 1");
        }
        Ok(())
    }
}

pub fn validate_output_pattern(pattern: &str) -> Result<()> {
    if !pattern.contains(VARIANT_PLACEHOLDER) {
        bail!(
            "Invalid 'outputPattern': \"{}\" must contain {}",
            pattern,
            VARIANT_PLACEHOLDER
        );
    }
    Ok(())
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory relative paths are resolved against: the config file's
    /// directory, or the start directory when using defaults.
    pub root: PathBuf,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                root,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            root: start_dir.to_path_buf(),
        }),
    }
}

/// Resolve a configured path: `~/` expands to `$HOME`, relative paths are
/// taken from `root`.
///
/// A `~/` path with `HOME` unset is an error rather than a directory named
/// `~` below `root`.
pub fn resolve_path(root: &Path, path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => match env::var_os("HOME").filter(|home| !home.is_empty()) {
            Some(home) => Ok(PathBuf::from(home).join(rest)),
            None => bail!("Cannot expand \"{}\": HOME is not set", path),
        },
        None => Ok(root.join(path)),
    }
}
