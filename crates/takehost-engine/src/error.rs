//! Error types for hosting runs.

use std::path::PathBuf;

use takehost_config::ConfigError;
use takehost_core::PluginError;
use thiserror::Error;

/// Fatal errors of an offline run.
///
/// Every variant maps to a process exit code via
/// [`exit_code`](Self::exit_code).
#[derive(Debug, Error)]
pub enum HostError {
    /// The input audio file does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The chain file does not exist.
    #[error("chain file not found: {}", .0.display())]
    ChainNotFound(PathBuf),

    /// The input exists but could not be decoded.
    #[error("failed to read input file {}: {source}", path.display())]
    InputRead {
        /// Input path.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: takehost_io::Error,
    },

    /// The chain description is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No plugin type was discovered in a plugin file.
    #[error("no plugin types found for {}", .0.display())]
    PluginNotFound(PathBuf),

    /// A plugin was discovered but could not be instantiated.
    #[error("failed to load plugin {}: {message}", path.display())]
    PluginLoad {
        /// Plugin path.
        path: PathBuf,
        /// Diagnostic from the hosting runtime.
        message: String,
    },

    /// The output file could not be created or written.
    #[error("failed to write output file {}: {source}", path.display())]
    OutputWrite {
        /// Output path.
        path: PathBuf,
        /// Encoder or filesystem error.
        #[source]
        source: takehost_io::Error,
    },
}

impl HostError {
    /// Process exit code for this failure.
    pub const fn exit_code(&self) -> i32 {
        match self {
            HostError::InputNotFound(_) | HostError::ChainNotFound(_) => 2,
            HostError::InputRead { .. } => 3,
            HostError::Config(_) => 4,
            HostError::PluginNotFound(_) | HostError::PluginLoad { .. } => 5,
            HostError::OutputWrite { .. } => 6,
        }
    }

    /// Create an output write error.
    pub fn output_write(path: impl Into<PathBuf>, source: impl Into<takehost_io::Error>) -> Self {
        HostError::OutputWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}

impl From<PluginError> for HostError {
    fn from(err: PluginError) -> Self {
        match err {
            PluginError::NotFound { path } => HostError::PluginNotFound(path),
            PluginError::Load { path, message } => HostError::PluginLoad { path, message },
            PluginError::UnknownFormat(format) => HostError::PluginLoad {
                path: PathBuf::new(),
                message: format!("unknown plugin format {format}"),
            },
        }
    }
}

/// Non-fatal failures reading or writing a preset file.
#[derive(Debug, Error)]
pub enum PresetError {
    /// The preset path does not name an existing regular file.
    #[error("preset file not found: {}", .0.display())]
    NotAFile(PathBuf),

    /// Saving was requested without a destination.
    #[error("no preset path given")]
    EmptyPath,

    /// The preset could not be read.
    #[error("failed to read preset {}: {source}", path.display())]
    Read {
        /// Preset path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The preset could not be written.
    #[error("failed to write preset {}: {source}", path.display())]
    Write {
        /// Preset path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_failure_class() {
        let io = || takehost_io::Error::UnsupportedFormat("x".into());
        assert_eq!(HostError::InputNotFound("a".into()).exit_code(), 2);
        assert_eq!(HostError::ChainNotFound("c".into()).exit_code(), 2);
        assert_eq!(
            HostError::InputRead { path: "a".into(), source: io() }.exit_code(),
            3
        );
        assert_eq!(HostError::Config(ConfigError::NoPlugins).exit_code(), 4);
        assert_eq!(HostError::PluginNotFound("p".into()).exit_code(), 5);
        assert_eq!(HostError::output_write("o", io()).exit_code(), 6);
    }

    #[test]
    fn plugin_errors_convert() {
        let err: HostError = PluginError::not_found("/fx/a.vst3").into();
        assert!(matches!(err, HostError::PluginNotFound(_)));

        let err: HostError = PluginError::load("/fx/a.vst3", "bad magic").into();
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn config_errors_are_transparent() {
        let err = HostError::from(ConfigError::NoPlugins);
        assert_eq!(err.to_string(), "chain JSON has no plugins");
    }
}
