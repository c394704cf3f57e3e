//! Built-in effect bundles for takehost.
//!
//! A `.thfx` file is a JSON manifest listing effect types drawn from a small
//! catalog (gain, high-pass, low-pass, noise gate, thru). [`BundleFormat`]
//! exposes them through the same [`PluginFormat`] interface a binary plugin
//! runtime would, so chains, presets and the editor work end to end without
//! any third-party plugin installed.
//!
//! # Example
//!
//! ```rust
//! use takehost_builtin::{BundleEntry, BundleManifest, EffectKind, default_registry};
//!
//! let dir = std::env::temp_dir().join("takehost-builtin-doc");
//! let path = dir.join("trim.thfx");
//! BundleManifest::new()
//!     .with_plugin(BundleEntry::new(EffectKind::Gain).with_param("gain_db", -3.0))
//!     .save(&path)
//!     .unwrap();
//!
//! let registry = default_registry();
//! let types = registry.find_types(&path);
//! assert_eq!(types.len(), 1);
//! let instance = registry.create_instance(&types[0], 48000.0, 512).unwrap();
//! assert_eq!(instance.param(0), Some(-3.0));
//! ```

pub mod dsp;
mod effect;
mod instance;
mod manifest;

use std::path::Path;

use takehost_core::{FormatRegistry, PluginDescription, PluginFormat, PluginInstance};

pub use effect::EffectKind;
pub use instance::BuiltinInstance;
pub use manifest::{BundleEntry, BundleError, BundleManifest};

/// File extension of bundle manifests, without the dot.
pub const BUNDLE_EXTENSION: &str = "thfx";

/// The plugin format backed by `.thfx` manifests.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundleFormat;

impl BundleFormat {
    /// Format name stored in [`PluginDescription::format_name`].
    pub const NAME: &'static str = "Bundle";

    /// Create the format.
    pub fn new() -> Self {
        Self
    }
}

fn parse_identifier(identifier: &str) -> Option<(usize, &str)> {
    let (index, kind) = identifier.split_once(':')?;
    Some((index.parse().ok()?, kind))
}

impl PluginFormat for BundleFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn file_might_contain(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(BUNDLE_EXTENSION))
            && path.is_file()
    }

    fn find_types(&self, path: &Path) -> Vec<PluginDescription> {
        let manifest = match BundleManifest::load(path) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "not a readable bundle");
                return Vec::new();
            }
        };

        manifest
            .plugins
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let Some(kind) = entry.kind() else {
                    tracing::debug!(effect = %entry.effect, "skipping unknown effect in bundle");
                    return None;
                };
                Some(PluginDescription {
                    name: entry.display_name()?,
                    format_name: Self::NAME.to_string(),
                    path: path.to_path_buf(),
                    identifier: format!("{index}:{}", kind.id()),
                    num_inputs: 2,
                    num_outputs: 2,
                })
            })
            .collect()
    }

    fn instantiate(
        &self,
        description: &PluginDescription,
        _sample_rate: f64,
        _block_size: usize,
    ) -> Result<Box<dyn PluginInstance>, String> {
        let (index, kind_id) = parse_identifier(&description.identifier)
            .ok_or_else(|| format!("malformed bundle identifier '{}'", description.identifier))?;
        let manifest = BundleManifest::load(&description.path).map_err(|e| e.to_string())?;
        let entry = manifest
            .plugins
            .get(index)
            .ok_or_else(|| format!("bundle has no entry {index}"))?;
        let kind = entry
            .kind()
            .filter(|k| k.id() == kind_id)
            .ok_or_else(|| format!("bundle entry {index} is no longer '{kind_id}'"))?;
        let values = entry.initial_values().unwrap_or_default();

        Ok(Box::new(BuiltinInstance::new(
            kind,
            description.name.clone(),
            &values,
        )))
    }
}

/// Register every built-in format.
pub fn register_builtin_formats(registry: &mut FormatRegistry) {
    registry.add_format(Box::new(BundleFormat::new()));
}

/// A registry holding only the built-in formats.
pub fn default_registry() -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    register_builtin_formats(&mut registry);
    registry
}
