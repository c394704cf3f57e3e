//! Bundle manifest (`.thfx`) format.
//!
//! A bundle is a JSON file listing one or more effect types:
//!
//! ```json
//! {"plugins": [{"effect": "gain", "name": "Trim", "params": {"gain_db": -3.0}}]}
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::effect::EffectKind;

/// Errors reading or writing a bundle manifest.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The manifest could not be read.
    #[error("failed to read bundle {}: {source}", path.display())]
    Read {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The manifest could not be written.
    #[error("failed to write bundle {}: {source}", path.display())]
    Write {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The manifest is not valid JSON for this format.
    #[error("invalid bundle manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One effect type declared in a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleEntry {
    /// Effect identifier (see [`EffectKind::id`]).
    pub effect: String,

    /// Display name override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Initial parameter values by parameter id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f32>,
}

impl BundleEntry {
    /// Entry for an effect with default parameters.
    pub fn new(kind: EffectKind) -> Self {
        Self {
            effect: kind.id().to_string(),
            name: None,
            params: BTreeMap::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set an initial parameter value.
    pub fn with_param(mut self, id: impl Into<String>, value: f32) -> Self {
        self.params.insert(id.into(), value);
        self
    }

    /// The effect this entry refers to, if known.
    pub fn kind(&self) -> Option<EffectKind> {
        EffectKind::from_id(&self.effect)
    }

    /// Display name, falling back to the effect's default name.
    pub fn display_name(&self) -> Option<String> {
        match &self.name {
            Some(name) if !name.trim().is_empty() => Some(name.clone()),
            _ => self.kind().map(|k| k.display_name().to_string()),
        }
    }

    /// Initial parameter values in descriptor order, clamped to range.
    ///
    /// Unknown ids are ignored and missing ids take the default.
    pub fn initial_values(&self) -> Option<Vec<f32>> {
        let kind = self.kind()?;
        Some(
            kind.params()
                .iter()
                .map(|p| self.params.get(p.id).map_or(p.default, |&v| p.clamp(v)))
                .collect(),
        )
    }
}

/// Parsed contents of a bundle file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Declared effect types, in order.
    #[serde(default)]
    pub plugins: Vec<BundleEntry>,
}

impl BundleManifest {
    /// Empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with_plugin(mut self, entry: BundleEntry) -> Self {
        self.plugins.push(entry);
        self
    }

    /// Read a manifest from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BundleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, BundleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the manifest to disk as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BundleError> {
        let path = path.as_ref();
        let write_err = |source: std::io::Error| BundleError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)
    }
}
