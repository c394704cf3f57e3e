//! Chain files: an ordered list of plugin slots.
//!
//! A chain file is JSON of the form
//!
//! ```json
//! {
//!   "version": 1,
//!   "plugins": [
//!     { "path": "plugins/declick.thfx", "preset": "presets/declick.bin", "bypass": false }
//!   ]
//! }
//! ```
//!
//! Loading is lenient about individual entries (non-objects and entries
//! without a usable `path` are skipped) but strict about the document as a
//! whole.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ConfigError;

/// Current chain document version.
pub const CHAIN_VERSION: u32 = 1;

/// One resolved entry of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Absolute path of the plugin file or bundle.
    pub plugin_path: PathBuf,
    /// Absolute path of the preset to apply after preparation.
    pub preset_path: Option<PathBuf>,
    /// Skip this plugin entirely.
    pub bypass: bool,
}

impl Slot {
    /// An active slot without a preset.
    pub fn new(plugin_path: impl Into<PathBuf>) -> Self {
        Self {
            plugin_path: plugin_path.into(),
            preset_path: None,
            bypass: false,
        }
    }

    /// Set the preset path.
    pub fn with_preset(mut self, preset_path: impl Into<PathBuf>) -> Self {
        self.preset_path = Some(preset_path.into());
        self
    }

    /// Set the bypass flag.
    pub fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }
}

/// A validated chain: at least one slot, every plugin path absolute.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSpec {
    slots: Vec<Slot>,
}

impl ChainSpec {
    /// Load and validate a chain file.
    ///
    /// Relative paths inside the file are resolved against the file's
    /// parent directory. A relative `path` is taken from the current
    /// directory first, so every slot path comes out absolute.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = std::path::absolute(path.as_ref())
            .map_err(|e| ConfigError::read_file(path.as_ref(), e))?;
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::read_file(&path, e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("/"));
        let spec = Self::from_json(&text, base_dir)?;
        tracing::debug!(
            chain = %path.display(),
            slots = spec.len(),
            active = spec.active_slots().count(),
            "loaded chain"
        );
        Ok(spec)
    }

    /// Parse chain JSON, resolving relative paths against `base_dir`.
    pub fn from_json(text: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_value(&document, base_dir)
    }

    /// Validate an already parsed document.
    pub fn from_value(document: &Value, base_dir: &Path) -> Result<Self, ConfigError> {
        let object = document.as_object().ok_or(ConfigError::NotAnObject)?;
        let plugins = object
            .get("plugins")
            .and_then(Value::as_array)
            .ok_or(ConfigError::MissingPlugins)?;
        if plugins.is_empty() {
            return Err(ConfigError::NoPlugins);
        }

        let slots: Vec<Slot> = plugins
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|entry| {
                let text = |key: &str| entry.get(key).and_then(Value::as_str).unwrap_or("");
                let plugin_path = resolve_path(base_dir, text("path"))?;
                Some(Slot {
                    plugin_path,
                    preset_path: resolve_path(base_dir, text("preset")),
                    bypass: entry.get("bypass").and_then(Value::as_bool).unwrap_or(false),
                })
            })
            .collect();

        if slots.is_empty() {
            return Err(ConfigError::NoValidPluginPaths);
        }
        Ok(Self { slots })
    }

    /// Build a chain from slots that are already resolved.
    pub fn from_slots(slots: Vec<Slot>) -> Result<Self, ConfigError> {
        if slots.is_empty() {
            return Err(ConfigError::NoPlugins);
        }
        Ok(Self { slots })
    }

    /// Every slot, in chain order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Non-bypassed slots, in chain order.
    pub fn active_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| !s.bypass)
    }

    /// Number of slots, bypassed ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false` for a validated chain.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Turn a raw path string from a chain file into an absolute path.
///
/// Surrounding whitespace and one layer of matching `"` or `'` quotes are
/// removed. Absolute paths are kept; relative ones are joined to `base_dir`.
/// Returns `None` when nothing is left after cleaning.
pub fn resolve_path(base_dir: &Path, raw: &str) -> Option<PathBuf> {
    let cleaned = strip_quotes(raw.trim());
    if cleaned.is_empty() {
        return None;
    }
    let path = Path::new(cleaned);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    Some(normalize(&joined))
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return s[1..s.len() - 1].trim();
        }
    }
    s
}

/// Lexically remove `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Unresolved slot as stored in chain documents and the chain library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// Plugin path, absolute or relative to the chain file.
    #[serde(default)]
    pub path: String,
    /// Optional preset path.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preset: String,
    /// Skip this plugin.
    #[serde(default)]
    pub bypass: bool,
}

impl ChainEntry {
    /// Entry for a plugin path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the preset path.
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    /// Set the bypass flag.
    pub fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }
}

/// Serializable chain file body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDocument {
    /// Document version.
    pub version: u32,
    /// Slots in chain order.
    pub plugins: Vec<ChainEntry>,
}

impl ChainDocument {
    /// Document at the current version.
    pub fn new(plugins: Vec<ChainEntry>) -> Self {
        Self {
            version: CHAIN_VERSION,
            plugins,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        std::fs::write(path, self.to_json()?).map_err(|e| ConfigError::write_file(path, e))
    }
}
