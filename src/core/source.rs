//! Value source: asks the operator for one value per (key, variant).
//!
//! The operator sees the effective default and, for required keys, the
//! previously cached secret. An empty answer accepts the suggestion. Required
//! keys without a cached value are asked again, up to a bounded number of
//! attempts; running out of attempts or input is an `InputRequired` error.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use super::definition::ConfigKeyDefinition;
use super::secrets::SecretCache;
use super::variant::Variant;
use crate::error::{Error, Result};

/// Everything shown to the operator for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt<'a> {
    pub key: &'a str,
    pub variant: &'a str,
    pub default: Option<&'a str>,
    pub cached: Option<&'a str>,
    pub required: bool,
}

pub trait ValueSource {
    /// Ask for a value. `Ok(None)` means the input is exhausted.
    fn request(&mut self, prompt: &Prompt<'_>) -> io::Result<Option<String>>;

    /// Called when an empty answer was given for a required key.
    fn reject(&mut self, _prompt: &Prompt<'_>) {}
}

/// Line-oriented prompt over a reader/writer pair (stdin/stdout in the CLI).
pub struct TerminalSource<R, W> {
    reader: R,
    writer: W,
}

impl TerminalSource<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalSource<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> ValueSource for TerminalSource<R, W> {
    fn request(&mut self, prompt: &Prompt<'_>) -> io::Result<Option<String>> {
        write!(self.writer, "{} >> {}", prompt.key.bold(), prompt.variant.cyan())?;
        if let Some(default) = prompt.default {
            write!(self.writer, " [{}]", default)?;
        }
        if let Some(cached) = prompt.cached {
            write!(self.writer, " [{}]", cached.dimmed())?;
        }
        if prompt.required && prompt.cached.is_none() {
            write!(self.writer, " {}", "(required)".yellow())?;
        }
        write!(self.writer, ": ")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            writeln!(self.writer)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn reject(&mut self, prompt: &Prompt<'_>) {
        let _ = writeln!(
            self.writer,
            "{} You must provide a value for {} in {}!",
            "error:".bold().red(),
            prompt.key,
            prompt.variant
        );
    }
}

/// The default offered for `key` at `variant`.
///
/// Own override first, then the first non-empty override among `parents`,
/// then the global default.
pub fn effective_default<'a>(
    key: &'a ConfigKeyDefinition,
    variant: &str,
    parents: &[String],
) -> Option<&'a str> {
    key.override_default(variant)
        .or_else(|| {
            parents
                .iter()
                .filter_map(|parent| key.override_default(parent))
                .find(|default| !default.is_empty())
        })
        .or(key.default.as_deref())
}

/// Acquire the value of `key` for `variant`.
///
/// A key is required when it has no effective default and `variant` sits
/// exactly at the key's `max_level`. Only required values are written to
/// `cache`.
pub fn acquire<S: ValueSource + ?Sized>(
    source: &mut S,
    variant: &Variant,
    key: &ConfigKeyDefinition,
    cache: &mut SecretCache,
    max_attempts: usize,
) -> Result<Option<String>> {
    let default = effective_default(key, &variant.name, &variant.parents);
    let required = default.is_none() && variant.level == key.max_level;
    let cached = if required {
        cache.get(&variant.name, &key.name).map(str::to_string)
    } else {
        None
    };

    let prompt = Prompt {
        key: &key.name,
        variant: &variant.name,
        default,
        cached: cached.as_deref(),
        required,
    };

    for _ in 0..max_attempts.max(1) {
        let answer = source.request(&prompt).unwrap_or_else(|err| {
            tracing::warn!(key = %key.name, variant = %variant.name, "failed to read input: {}", err);
            None
        });
        let exhausted = answer.is_none();
        let value = answer.unwrap_or_default();

        if !value.is_empty() {
            if required {
                cache.insert(&variant.name, &key.name, &value);
            }
            return Ok(Some(value));
        }
        if !required {
            return Ok(default.map(str::to_string));
        }
        if let Some(cached) = prompt.cached {
            return Ok(Some(cached.to_string()));
        }
        if exhausted {
            break;
        }
        source.reject(&prompt);
    }

    Err(Error::InputRequired {
        key: key.name.clone(),
        variant: variant.name.clone(),
    })
}

/// Answers from a fixed script, recording every prompt it was shown.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<(String, String)>,
    pub rejected: usize,
}

#[cfg(test)]
impl ScriptedSource {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            asked: Vec::new(),
            rejected: 0,
        }
    }

    /// Whether `key` was ever prompted at `variant`.
    pub fn was_asked(&self, key: &str, variant: &str) -> bool {
        self.asked.iter().any(|(k, v)| k == key && v == variant)
    }
}

#[cfg(test)]
impl ValueSource for ScriptedSource {
    fn request(&mut self, prompt: &Prompt<'_>) -> io::Result<Option<String>> {
        self.asked
            .push((prompt.key.to_string(), prompt.variant.to_string()));
        Ok(self.answers.pop_front())
    }

    fn reject(&mut self, _prompt: &Prompt<'_>) {
        self.rejected += 1;
    }
}
