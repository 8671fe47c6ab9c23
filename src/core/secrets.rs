//! Secret cache: last-entered values for keys that must not live in the repo.
//!
//! Stored as a JSON object `{ variant: { key: value } }`. The file is read
//! once before resolution and rewritten as a whole afterwards.

use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SecretCache {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

/// Result of loading the cache.
pub struct CacheLoad {
    pub cache: SecretCache,
    /// Set when the file existed but could not be used; the cache starts empty.
    pub warning: Option<Error>,
}

impl SecretCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variant: &str, key: &str) -> Option<&str> {
        self.entries
            .get(variant)
            .and_then(|values| values.get(key))
            .map(String::as_str)
    }

    pub fn insert(&mut self, variant: &str, key: &str, value: &str) {
        self.entries
            .entry(variant.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Number of cached (variant, key) pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load the cache, failing open: a missing file is an empty cache, an
    /// unreadable or corrupt one is an empty cache plus a warning.
    pub fn load(path: &Path) -> CacheLoad {
        if !path.exists() {
            return CacheLoad {
                cache: Self::new(),
                warning: None,
            };
        }

        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<SecretCache>(&content).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(cache) => CacheLoad {
                cache,
                warning: None,
            },
            Err(reason) => CacheLoad {
                cache: Self::new(),
                warning: Some(unavailable(path, reason)),
            },
        }
    }

    /// Overwrite the store with the full cache.
    ///
    /// On unix the file is readable by its owner only.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| unavailable(path, e.to_string()))?;
        }
        let content =
            serde_json::to_string_pretty(self).map_err(|e| unavailable(path, e.to_string()))?;
        write_private(path, format!("{}\n", content).as_bytes())
            .map_err(|e| unavailable(path, e.to_string()))
    }
}

#[cfg(unix)]
const PRIVATE_MODE: u32 = 0o600;

fn write_private(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        options.mode(PRIVATE_MODE);
        let mut file = options.open(path)?;
        // mode only applies on creation; tighten files left by older runs
        file.set_permissions(fs::Permissions::from_mode(PRIVATE_MODE))?;
        file.write_all(content)
    }
    #[cfg(not(unix))]
    {
        options.open(path)?.write_all(content)
    }
}

fn unavailable(path: &Path, reason: String) -> Error {
    Error::CacheUnavailable {
        path: PathBuf::from(path),
        reason,
    }
}
