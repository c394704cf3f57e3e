//! Named chain library.
//!
//! A single JSON file mapping chain names to slot lists:
//!
//! ```json
//! { "version": 1, "presets": { "podcast": [ { "path": "/fx/gate.thfx" } ] } }
//! ```
//!
//! Every mutation is written to disk immediately.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::chain::{CHAIN_VERSION, ChainDocument, ChainEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LibraryFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    presets: BTreeMap<String, Vec<ChainEntry>>,
}

fn default_version() -> u32 {
    CHAIN_VERSION
}

impl Default for LibraryFile {
    fn default() -> Self {
        Self {
            version: CHAIN_VERSION,
            presets: BTreeMap::new(),
        }
    }
}

/// Persistent store of named chains.
#[derive(Debug, Clone)]
pub struct ChainLibrary {
    path: PathBuf,
    data: LibraryFile,
}

impl ChainLibrary {
    /// Open the library at `path`.
    ///
    /// A missing or unreadable file gives an empty library; nothing is
    /// written until the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(library = %path.display(), error = %e, "chain library is corrupt, starting empty");
                LibraryFile::default()
            }),
            Err(_) => LibraryFile::default(),
        };
        Self { path, data }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Chain names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.data.presets.keys().map(String::as_str).collect()
    }

    /// Slots of a named chain.
    pub fn get(&self, name: &str) -> Option<&[ChainEntry]> {
        self.data.presets.get(name).map(Vec::as_slice)
    }

    /// Store (or replace) a named chain and persist.
    pub fn insert(&mut self, name: impl Into<String>, slots: Vec<ChainEntry>) -> Result<(), ConfigError> {
        self.data.presets.insert(name.into(), slots);
        self.persist()
    }

    /// Remove a named chain and persist. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> Result<bool, ConfigError> {
        if self.data.presets.remove(name).is_none() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// A chain file body for a named chain.
    pub fn to_chain_document(&self, name: &str) -> Result<ChainDocument, ConfigError> {
        let slots = self
            .get(name)
            .ok_or_else(|| ConfigError::ChainNotFound(name.to_string()))?;
        Ok(ChainDocument::new(slots.to_vec()))
    }

    fn persist(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let text = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, text).map_err(|e| ConfigError::write_file(&self.path, e))?;
        tracing::debug!(library = %self.path.display(), chains = self.data.presets.len(), "saved chain library");
        Ok(())
    }
}
