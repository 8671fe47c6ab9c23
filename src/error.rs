//! Error taxonomy for resolution, compaction and rendering.
//!
//! Fatal errors abort the run through `Result`. Non-fatal ones
//! (`UnresolvedPlaceholder`, `CacheUnavailable` on load, `MissingDefinition`
//! while rendering) are collected as diagnostics and reported at the end.

use std::path::PathBuf;

/// Severity level of a collected diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no definition for key '{key}' (variant '{variant}')")]
    MissingDefinition { key: String, variant: String },

    #[error("secret cache {} unavailable: {reason}", path.display())]
    CacheUnavailable { path: PathBuf, reason: String },

    #[error("a value for '{key}' in '{variant}' is required but none was provided")]
    InputRequired { key: String, variant: String },

    #[error("unresolved placeholder %%{placeholder}%% in '{key}' (variant '{variant}')")]
    UnresolvedPlaceholder {
        variant: String,
        key: String,
        placeholder: String,
    },

    #[error("invalid definitions: {0}")]
    InvalidDefinitions(String),
}

impl Error {
    pub fn severity(&self) -> Severity {
        match self {
            Error::UnresolvedPlaceholder { .. } | Error::CacheUnavailable { .. } => {
                Severity::Warning
            }
            Error::MissingDefinition { .. }
            | Error::InputRequired { .. }
            | Error::InvalidDefinitions(_) => Severity::Error,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
