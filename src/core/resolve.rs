//! Resolution: one raw value per (key, variant).
//!
//! Every key is visited at every variant in traversal order. Where the key's
//! `max_level` allows it the operator is asked; elsewhere the variant only
//! receives the static override baked into the definition, if any.

use std::collections::BTreeMap;

use super::definition::ConfigKeyDefinition;
use super::secrets::SecretCache;
use super::source::{ValueSource, acquire};
use super::variant::VariantGraph;
use crate::error::Result;

/// Values of one variant. `None` marks a key that was visited but has no value.
pub type VariantTable = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    tables: BTreeMap<String, VariantTable>,
}

impl ResolvedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variant: &str, key: &str, value: Option<String>) {
        self.tables
            .entry(variant.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn table(&self, variant: &str) -> Option<&VariantTable> {
        self.tables.get(variant)
    }

    pub fn get(&self, variant: &str, key: &str) -> Option<&str> {
        self.tables
            .get(variant)
            .and_then(|table| table.get(key))
            .and_then(|value| value.as_deref())
    }
}

/// Resolve all `keys` over all variants of `graph`.
///
/// Fails with `InputRequired` as soon as a required value cannot be obtained.
pub fn resolve<S: ValueSource + ?Sized>(
    keys: &[ConfigKeyDefinition],
    graph: &VariantGraph,
    source: &mut S,
    cache: &mut SecretCache,
    max_attempts: usize,
) -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig::new();

    for key in keys {
        for variant in graph.iter() {
            let value = if variant.level.within(key.max_level) {
                acquire(source, variant, key, cache, max_attempts)?
            } else {
                let value = key.override_default(&variant.name).map(str::to_string);
                if value.is_some() {
                    tracing::debug!(
                        key = %key.name,
                        variant = %variant.name,
                        max_level = %key.max_level,
                        "using static override beyond max level"
                    );
                }
                value
            };
            resolved.insert(&variant.name, &key.name, value);
        }
    }

    Ok(resolved)
}
