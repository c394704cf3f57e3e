//! Error types for plugin discovery and instantiation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a plugin file into a live instance.
#[derive(Debug, Error)]
pub enum PluginError {
    /// No registered format found a plugin type in the file.
    #[error("no plugin types found for {}", path.display())]
    NotFound {
        /// The file that was searched.
        path: PathBuf,
    },

    /// Discovery succeeded but the runtime could not create an instance.
    #[error("failed to load plugin {}: {message}", path.display())]
    Load {
        /// The plugin file.
        path: PathBuf,
        /// Diagnostic from the hosting runtime.
        message: String,
    },

    /// A description names a format that is not registered.
    #[error("unknown plugin format: {0}")]
    UnknownFormat(String),
}

impl PluginError {
    /// Create a not-found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        PluginError::NotFound { path: path.into() }
    }

    /// Create a load error.
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PluginError::Load {
            path: path.into(),
            message: message.into(),
        }
    }
}
