//! Registry of plugin formats.

use std::path::Path;

use crate::error::PluginError;
use crate::plugin::{PluginDescription, PluginFormat, PluginInstance};

/// The set of plugin formats available for one run.
///
/// Built once at startup, passed by reference to every session that needs
/// it, and dropped at shutdown. Discovery asks every format in registration
/// order and concatenates the results.
#[derive(Default)]
pub struct FormatRegistry {
    formats: Vec<Box<dyn PluginFormat>>,
}

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a format. Later formats are consulted after earlier ones.
    pub fn add_format(&mut self, format: Box<dyn PluginFormat>) {
        tracing::debug!(format = format.name(), "registered plugin format");
        self.formats.push(format);
    }

    /// Builder-style [`add_format`](Self::add_format).
    pub fn with_format(mut self, format: impl PluginFormat + 'static) -> Self {
        self.add_format(Box::new(format));
        self
    }

    /// Names of all registered formats, in order.
    pub fn format_names(&self) -> Vec<&str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    /// Number of registered formats.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Whether no format is registered.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Look up a format by name.
    pub fn format(&self, name: &str) -> Option<&dyn PluginFormat> {
        self.formats
            .iter()
            .find(|f| f.name() == name)
            .map(|f| &**f)
    }

    /// Every plugin type found in `path` by any format.
    ///
    /// Formats that do not claim the file are skipped without being asked to
    /// enumerate it.
    pub fn find_types(&self, path: &Path) -> Vec<PluginDescription> {
        let mut types = Vec::new();
        for format in &self.formats {
            if !format.file_might_contain(path) {
                continue;
            }
            let found = format.find_types(path);
            tracing::trace!(
                format = format.name(),
                count = found.len(),
                path = %path.display(),
                "enumerated plugin types"
            );
            types.extend(found);
        }
        types
    }

    /// Instantiate a description through the format that produced it.
    pub fn create_instance(
        &self,
        description: &PluginDescription,
        sample_rate: f64,
        block_size: usize,
    ) -> Result<Box<dyn PluginInstance>, PluginError> {
        let format = self
            .format(&description.format_name)
            .ok_or_else(|| PluginError::UnknownFormat(description.format_name.clone()))?;
        format
            .instantiate(description, sample_rate, block_size)
            .map_err(|message| PluginError::load(&description.path, message))
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.format_names())
            .finish()
    }
}
