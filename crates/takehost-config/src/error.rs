//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or storing chain configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The text is not JSON at all
    #[error("chain JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but its root is not an object
    #[error("chain JSON is invalid: root must be an object")]
    NotAnObject,

    /// The `plugins` property is absent or not an array
    #[error("chain JSON missing 'plugins' array")]
    MissingPlugins,

    /// The `plugins` array is empty
    #[error("chain JSON has no plugins")]
    NoPlugins,

    /// Every entry was dropped during path resolution
    #[error("no valid plugin paths")]
    NoValidPluginPaths,

    /// A named chain does not exist in the library
    #[error("chain not found: {0}")]
    ChainNotFound(String),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = ConfigError::read_file("/some/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::ReadFile { ref path, .. } if path == std::path::Path::new("/some/path"))
        );
    }

    #[test]
    fn write_file_factory_produces_correct_variant() {
        let err = ConfigError::write_file("/out/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::WriteFile { ref path, .. } if path == std::path::Path::new("/out/path"))
        );
    }

    #[test]
    fn io_variants_expose_source() {
        let err = ConfigError::create_dir("/dir", mock_io_err());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/dir"));
    }

    #[test]
    fn no_valid_paths_message() {
        assert_eq!(ConfigError::NoValidPluginPaths.to_string(), "no valid plugin paths");
    }
}
