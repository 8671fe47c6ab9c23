//! Variant model: override levels, variant naming and the parent graph.
//!
//! Variants form a small DAG: `main` is the root, every build and every brand
//! hangs off `main`, and every brand×build combination depends on its brand
//! and its build. The graph is walked in topological order so that ancestors
//! are always resolved, expanded and compacted before their descendants.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the root variant.
pub const MAIN: &str = "main";

/// Position of a variant in the override hierarchy.
///
/// `Build` and `Brand` are siblings: neither is deeper than the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Level {
    #[default]
    Main,
    Build,
    Brand,
    BrandBuild,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Main => "main",
            Level::Build => "build",
            Level::Brand => "brand",
            Level::BrandBuild => "brandBuild",
        }
    }

    /// Whether a key capped at `max_level` may still be prompted at `self`.
    ///
    /// Uses the partial order `main < {build, brand} < brandBuild`.
    pub fn within(self, max_level: Level) -> bool {
        match (self, max_level) {
            (Level::Main, _) | (_, Level::BrandBuild) => true,
            (level, max_level) => level == max_level,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named resolution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    pub level: Level,
    /// Default fallback order, most specific first.
    pub parents: Vec<String>,
    brand: Option<String>,
    build: Option<String>,
}

impl Variant {
    pub fn main() -> Self {
        Self {
            name: MAIN.to_string(),
            level: Level::Main,
            parents: Vec::new(),
            brand: None,
            build: None,
        }
    }

    pub fn build(build: &str) -> Self {
        Self {
            name: build.to_string(),
            level: Level::Build,
            parents: vec![MAIN.to_string()],
            brand: None,
            build: Some(build.to_string()),
        }
    }

    pub fn brand(brand: &str) -> Self {
        Self {
            name: brand.to_string(),
            level: Level::Brand,
            parents: vec![MAIN.to_string()],
            brand: Some(brand.to_string()),
            build: None,
        }
    }

    pub fn brand_build(brand: &str, build: &str) -> Self {
        Self {
            name: brand_build_name(brand, build),
            level: Level::BrandBuild,
            parents: vec![brand.to_string(), build.to_string(), MAIN.to_string()],
            brand: Some(brand.to_string()),
            build: Some(build.to_string()),
        }
    }

    pub fn brand_name(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn build_name(&self) -> Option<&str> {
        self.build.as_deref()
    }

    /// Tables consulted when expanding placeholders, own table first.
    ///
    /// Brand×build variants look at the build before the brand.
    pub fn lookup_chain(&self) -> Vec<&str> {
        match self.level {
            Level::Main => vec![self.name.as_str()],
            Level::Build | Level::Brand => vec![self.name.as_str(), MAIN],
            Level::BrandBuild => {
                let mut chain = vec![self.name.as_str()];
                chain.extend(self.build_name());
                chain.extend(self.brand_name());
                chain.push(MAIN);
                chain
            }
        }
    }
}

/// `barcoo` + `debug` => `barcooDebug`.
pub fn brand_build_name(brand: &str, build: &str) -> String {
    let mut chars = build.chars();
    match chars.next() {
        Some(first) => format!(
            "{}{}{}",
            brand,
            first.to_uppercase(),
            chars.as_str().to_lowercase()
        ),
        None => brand.to_string(),
    }
}

/// All variants of a run, stored in traversal order.
#[derive(Debug, Clone)]
pub struct VariantGraph {
    variants: Vec<Variant>,
    index: HashMap<String, usize>,
}

impl VariantGraph {
    /// Build the graph for the given brands and builds.
    ///
    /// Seeds are inserted as `main`, builds, brands, then brand×build pairs
    /// (brand-major); the topological walk keeps that order stable.
    pub fn new(brands: &[String], builds: &[String]) -> Result<Self> {
        let mut seeds = vec![Variant::main()];
        seeds.extend(builds.iter().map(|build| Variant::build(build)));
        seeds.extend(brands.iter().map(|brand| Variant::brand(brand)));
        for brand in brands {
            seeds.extend(builds.iter().map(|build| Variant::brand_build(brand, build)));
        }

        let mut seen = HashSet::new();
        for variant in &seeds {
            if variant.name.trim().is_empty() {
                return Err(Error::InvalidDefinitions(
                    "brand and build names must not be empty".to_string(),
                ));
            }
            if !seen.insert(variant.name.as_str()) {
                return Err(Error::InvalidDefinitions(format!(
                    "variant name '{}' is defined more than once",
                    variant.name
                )));
            }
        }

        let variants = topological_order(seeds)?;
        let index = variants
            .iter()
            .enumerate()
            .map(|(i, variant)| (variant.name.clone(), i))
            .collect();

        Ok(Self { variants, index })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.index.get(name).map(|&i| &self.variants[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Kahn's algorithm, always taking the earliest ready seed.
fn topological_order(seeds: Vec<Variant>) -> Result<Vec<Variant>> {
    let names: HashSet<&str> = seeds.iter().map(|v| v.name.as_str()).collect();
    for variant in &seeds {
        if let Some(parent) = variant.parents.iter().find(|p| !names.contains(p.as_str())) {
            return Err(Error::InvalidDefinitions(format!(
                "variant '{}' depends on unknown variant '{}'",
                variant.name, parent
            )));
        }
    }

    let mut placed: HashSet<String> = HashSet::new();
    let mut pending = seeds;
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let Some(pos) = pending
            .iter()
            .position(|v| v.parents.iter().all(|p| placed.contains(p)))
        else {
            let stuck: Vec<&str> = pending.iter().map(|v| v.name.as_str()).collect();
            return Err(Error::InvalidDefinitions(format!(
                "cyclic variant dependencies between: {}",
                stuck.join(", ")
            )));
        };
        let variant = pending.remove(pos);
        placed.insert(variant.name.clone());
        ordered.push(variant);
    }

    Ok(ordered)
}
