//! Compaction: expand placeholders per variant and drop inherited values.
//!
//! Variants are processed in topological order. Each one is first expanded
//! against its own raw table followed by its already compacted ancestors,
//! then diffed against those ancestors:
//!
//! - build and brand variants drop values equal to `main`;
//! - brand×build variants drop values equal to their brand's or build's, and
//!   values equal to `main`'s when neither brand nor build carries the key.
//!
//! Absent values and variants left empty are removed at the end.

use std::collections::{BTreeMap, HashMap};

use super::placeholder::{LookupTable, expand_optional};
use super::resolve::{ResolvedConfig, VariantTable};
use super::variant::{Level, MAIN, Variant, VariantGraph};
use crate::error::Error;

/// A variant that survived compaction together with its remaining values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactedVariant {
    pub name: String,
    pub level: Level,
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactedConfig {
    variants: Vec<CompactedVariant>,
}

impl CompactedConfig {
    pub fn iter(&self) -> impl Iterator<Item = &CompactedVariant> {
        self.variants.iter()
    }

    pub fn get(&self, variant: &str) -> Option<&CompactedVariant> {
        self.variants.iter().find(|v| v.name == variant)
    }

    pub fn value(&self, variant: &str, key: &str) -> Option<&str> {
        self.get(variant)
            .and_then(|v| v.values.get(key))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

pub struct Compaction {
    pub config: CompactedConfig,
    /// `UnresolvedPlaceholder` warnings, one per token occurrence.
    pub diagnostics: Vec<Error>,
}

pub fn compact(resolved: &ResolvedConfig, graph: &VariantGraph) -> Compaction {
    let empty = VariantTable::new();
    let mut done: HashMap<&str, VariantTable> = HashMap::new();
    let mut diagnostics = Vec::new();

    for variant in graph.iter() {
        let raw = resolved.table(&variant.name).unwrap_or(&empty);

        let mut tables: Vec<&dyn LookupTable> = vec![raw as &dyn LookupTable];
        tables.extend(
            variant
                .lookup_chain()
                .into_iter()
                .skip(1)
                .filter_map(|name| done.get(name))
                .map(|table| table as &dyn LookupTable),
        );

        let mut expanded = VariantTable::new();
        for (key, value) in raw {
            let value = expand_optional(value.as_deref(), &tables).map(|expansion| {
                for placeholder in expansion.unresolved {
                    tracing::warn!(
                        variant = %variant.name,
                        key = %key,
                        "unresolved placeholder %%{}%%",
                        placeholder
                    );
                    diagnostics.push(Error::UnresolvedPlaceholder {
                        variant: variant.name.clone(),
                        key: key.clone(),
                        placeholder,
                    });
                }
                expansion.value
            });
            expanded.insert(key.clone(), value);
        }

        expanded.retain(|key, value| !is_inherited(variant, key, value.as_deref(), &done));
        done.insert(&variant.name, expanded);
    }

    let variants = graph
        .iter()
        .filter_map(|variant| {
            let values: BTreeMap<String, String> = done
                .remove(variant.name.as_str())?
                .into_iter()
                .filter_map(|(key, value)| value.map(|value| (key, value)))
                .collect();
            if values.is_empty() {
                tracing::debug!(variant = %variant.name, "nothing left to override");
                return None;
            }
            Some(CompactedVariant {
                name: variant.name.clone(),
                level: variant.level,
                values,
            })
        })
        .collect();

    Compaction {
        config: CompactedConfig { variants },
        diagnostics,
    }
}

/// Whether `value` is already provided by the variant's ancestors.
fn is_inherited(
    variant: &Variant,
    key: &str,
    value: Option<&str>,
    done: &HashMap<&str, VariantTable>,
) -> bool {
    let main = ancestor_value(done, Some(MAIN), key);

    match variant.level {
        Level::Main => false,
        Level::Build | Level::Brand => value == main,
        Level::BrandBuild => {
            let brand = ancestor_value(done, variant.brand_name(), key);
            let build = ancestor_value(done, variant.build_name(), key);
            value == brand
                || value == build
                || (brand.is_none() && build.is_none() && value == main)
        }
    }
}

fn ancestor_value<'a>(
    done: &'a HashMap<&str, VariantTable>,
    name: Option<&str>,
    key: &str,
) -> Option<&'a str> {
    name.and_then(|name| done.get(name))
        .and_then(|table| table.lookup(key))
}
