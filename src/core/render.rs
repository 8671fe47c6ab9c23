//! Rendering compacted variants into resource documents.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::compact::CompactedConfig;
use super::definition::{Definitions, ValueType};
use crate::error::Error;

pub const VARIANT_PLACEHOLDER: &str = "{variant}";

pub const DEFAULT_OUTPUT_PATTERN: &str = "app/src/{variant}/res/values/config.xml";

const TEMPLATE_HEADER: &str = "<?xml version='1.0' encoding='utf-8'?>\n<resources>\n";
const TEMPLATE_FOOTER: &str = "</resources>\n";

/// One typed value ready to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub value_type: ValueType,
    pub name: &'a str,
    pub value: &'a str,
}

/// Target format for rendered variants.
pub trait ResourceSink {
    /// Where the document for `variant` is written, relative to the project root.
    fn path_for(&self, variant: &str) -> PathBuf;

    fn render(&self, entries: &[Entry<'_>]) -> String;
}

/// Android `values` resource XML.
#[derive(Debug, Clone)]
pub struct XmlResourceSink {
    output_pattern: String,
}

impl XmlResourceSink {
    pub fn new(output_pattern: &str) -> Self {
        Self {
            output_pattern: output_pattern.to_string(),
        }
    }
}

impl Default for XmlResourceSink {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_PATTERN)
    }
}

impl ResourceSink for XmlResourceSink {
    fn path_for(&self, variant: &str) -> PathBuf {
        PathBuf::from(self.output_pattern.replace(VARIANT_PLACEHOLDER, variant))
    }

    fn render(&self, entries: &[Entry<'_>]) -> String {
        let mut xml = String::from(TEMPLATE_HEADER);
        for entry in entries {
            let element = entry.value_type.element_name();
            xml.push_str(&format!(
                "  <{} name=\"{}\">{}</{}>\n",
                element,
                escape_xml(entry.name),
                escape_xml(entry.value),
                element
            ));
        }
        xml.push_str(TEMPLATE_FOOTER);
        xml
    }
}

/// Escape characters that would break the markup.
///
/// Quotes are left alone: resource strings use their own `\'` escaping.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub path: PathBuf,
    pub content: String,
}

pub struct Rendering {
    pub documents: Vec<RenderedDocument>,
    /// `MissingDefinition` errors for keys that could not be rendered.
    pub diagnostics: Vec<Error>,
}

/// Render every compacted variant, keys in definition order.
///
/// A key without a definition is skipped and reported; the rest of its
/// variant still renders.
pub fn render_all(
    config: &CompactedConfig,
    definitions: &Definitions,
    sink: &dyn ResourceSink,
) -> Rendering {
    let mut documents = Vec::new();
    let mut diagnostics = Vec::new();

    for variant in config.iter() {
        let mut entries = Vec::with_capacity(variant.values.len());
        for (key, value) in &variant.values {
            match definitions.position(key) {
                Some(position) => entries.push((
                    position,
                    Entry {
                        value_type: definitions.keys[position].value_type,
                        name: key,
                        value,
                    },
                )),
                None => {
                    tracing::error!(variant = %variant.name, key = %key, "no definition for key");
                    diagnostics.push(Error::MissingDefinition {
                        key: key.clone(),
                        variant: variant.name.clone(),
                    });
                }
            }
        }
        if entries.is_empty() {
            continue;
        }
        entries.sort_by_key(|(position, _)| *position);
        let entries: Vec<Entry<'_>> = entries.into_iter().map(|(_, entry)| entry).collect();

        documents.push(RenderedDocument {
            path: sink.path_for(&variant.name),
            content: sink.render(&entries),
        });
    }

    Rendering {
        documents,
        diagnostics,
    }
}

/// Write documents below `root`, creating directories as needed.
///
/// Returns the written paths in document order.
pub fn write_documents(documents: &[RenderedDocument], root: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(documents.len());
    for document in documents {
        let path = root.join(&document.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&path, &document.content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        written.push(document.path.clone());
    }
    Ok(written)
}
