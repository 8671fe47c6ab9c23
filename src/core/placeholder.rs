//! `%%name%%` placeholder expansion over prioritized lookup tables.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%([^%]+)%%").unwrap());

/// Anything that can answer "what is the value of `name`?".
pub trait LookupTable {
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl LookupTable for BTreeMap<String, Option<String>> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|value| value.as_deref())
    }
}

impl LookupTable for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Result of expanding one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub value: String,
    /// Placeholder names no table could resolve, in order of appearance.
    pub unresolved: Vec<String>,
}

/// Replace every `%%name%%` in `value` with the entry from the first table
/// that has one. Unresolved tokens are left in place, delimiters included.
pub fn expand(value: &str, tables: &[&dyn LookupTable]) -> Expansion {
    let mut unresolved = Vec::new();
    let expanded = PLACEHOLDER_REGEX.replace_all(value, |caps: &Captures| {
        let name = &caps[1];
        match tables.iter().find_map(|table| table.lookup(name)) {
            Some(replacement) => replacement.to_string(),
            None => {
                unresolved.push(name.to_string());
                caps[0].to_string()
            }
        }
    });

    Expansion {
        value: expanded.into_owned(),
        unresolved,
    }
}

/// Like [`expand`], passing absent values through unchanged.
pub fn expand_optional(value: Option<&str>, tables: &[&dyn LookupTable]) -> Option<Expansion> {
    value.map(|value| expand(value, tables))
}
