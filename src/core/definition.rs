//! Static key definitions loaded once per run.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::variant::{Level, VariantGraph};
use crate::error::{Error, Result};

/// Starter definitions written by `flavorgen init`.
pub const EXAMPLE_DEFINITIONS: &str = r#"{
  "brands": [],
  "builds": ["debug", "release"],
  "keys": [
    {
      "name": "api_base_uri",
      "type": "string",
      "maxLevel": "build",
      "default": "https://example.com/",
      "overrides": {
        "debug": { "default": "https://stage.example.com/" }
      }
    }
  ]
}
"#;

/// Resource value type, used as the element name when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Bool,
    Integer,
    Color,
    Dimen,
}

impl ValueType {
    pub fn element_name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Integer => "integer",
            ValueType::Color => "color",
            ValueType::Dimen => "dimen",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideBlock {
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigKeyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Advisory marker; requiredness is derived from defaults and `max_level`.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub max_level: Level,
    #[serde(default)]
    pub default: Option<String>,
    /// Per-variant default overrides, keyed by variant name.
    #[serde(default)]
    pub overrides: BTreeMap<String, OverrideBlock>,
}

impl ConfigKeyDefinition {
    pub fn new(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            required: false,
            max_level: Level::Main,
            default: None,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_max_level(mut self, max_level: Level) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_override(mut self, variant: &str, default: &str) -> Self {
        self.overrides.insert(
            variant.to_string(),
            OverrideBlock {
                default: Some(default.to_string()),
            },
        );
        self
    }

    /// The default baked into the definition for exactly this variant.
    pub fn override_default(&self, variant: &str) -> Option<&str> {
        self.overrides
            .get(variant)
            .and_then(|block| block.default.as_deref())
    }
}

/// The whole definitions file: brand and build lists plus all keys.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Definitions {
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub builds: Vec<String>,
    #[serde(default)]
    pub keys: Vec<ConfigKeyDefinition>,
}

impl Definitions {
    pub fn from_json(content: &str) -> Result<Self> {
        let definitions: Definitions =
            serde_json::from_str(content).map_err(|e| Error::InvalidDefinitions(e.to_string()))?;
        definitions.validate()?;
        Ok(definitions)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read definitions: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to load definitions: {}", path.display()))
    }

    /// Key identifiers must be unique and non-empty.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for key in &self.keys {
            if key.name.is_empty() {
                return Err(Error::InvalidDefinitions(
                    "key names must not be empty".to_string(),
                ));
            }
            if !seen.insert(key.name.as_str()) {
                return Err(Error::InvalidDefinitions(format!(
                    "key '{}' is defined more than once",
                    key.name
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ConfigKeyDefinition> {
        self.keys.iter().find(|key| key.name == name)
    }

    /// Position of a key in the file, used to order rendered output.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.keys.iter().position(|key| key.name == name)
    }

    pub fn variant_graph(&self) -> Result<VariantGraph> {
        VariantGraph::new(&self.brands, &self.builds)
    }

    /// Override blocks naming a variant that is not part of the graph.
    ///
    /// Returns `(key, variant)` pairs; these blocks can never take effect.
    pub fn unknown_override_variants(&self, graph: &VariantGraph) -> Vec<(String, String)> {
        self.keys
            .iter()
            .flat_map(|key| {
                key.overrides
                    .keys()
                    .filter(|variant| !graph.contains(variant))
                    .map(|variant| (key.name.clone(), variant.clone()))
            })
            .collect()
    }
}
