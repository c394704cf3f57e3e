//! Audio format registry.

use std::path::Path;

use crate::stream::{FrameSink, FrameSource, OutputSpec};
use crate::wav::WavFormat;
use crate::{Error, Result};

/// A file format that can produce frame sources and sinks.
pub trait AudioFormat: Send + Sync {
    /// Display name.
    fn name(&self) -> &str;

    /// Lower-case file extensions, without the dot.
    fn extensions(&self) -> &[&str];

    /// Open a file for reading. Fails if the content is not this format.
    fn open_reader(&self, path: &Path) -> Result<Box<dyn FrameSource>>;

    /// Create (or truncate) a file for writing.
    fn open_writer(&self, path: &Path, spec: OutputSpec) -> Result<Box<dyn FrameSink>>;

    /// Whether `path` carries one of this format's extensions.
    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }
}

/// The set of audio formats known to a run.
///
/// The first registered format is the default writer for unrecognized
/// extensions.
#[derive(Default)]
pub struct AudioFormatManager {
    formats: Vec<Box<dyn AudioFormat>>,
}

impl AudioFormatManager {
    /// An empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager with every built-in format registered.
    pub fn with_basic_formats() -> Self {
        let mut manager = Self::new();
        manager.register_basic_formats();
        manager
    }

    /// Register the built-in formats (WAV).
    pub fn register_basic_formats(&mut self) {
        self.register(Box::new(WavFormat));
    }

    /// Register a format.
    pub fn register(&mut self, format: Box<dyn AudioFormat>) {
        self.formats.push(format);
    }

    /// Names of registered formats, in order.
    pub fn format_names(&self) -> Vec<&str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    /// Open `path` with the first format that can decode it.
    ///
    /// Formats claiming the file's extension are tried first, then the rest.
    pub fn open_reader(&self, path: impl AsRef<Path>) -> Result<Box<dyn FrameSource>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }

        let (preferred, others): (Vec<_>, Vec<_>) =
            self.formats.iter().partition(|f| f.matches_extension(path));
        for format in preferred.into_iter().chain(others) {
            match format.open_reader(path) {
                Ok(source) => {
                    tracing::debug!(
                        path = %path.display(),
                        format = format.name(),
                        channels = source.num_channels(),
                        sample_rate = source.sample_rate(),
                        frames = source.total_frames(),
                        "opened audio source"
                    );
                    return Ok(source);
                }
                Err(e) => {
                    tracing::trace!(format = format.name(), error = %e, "format rejected file");
                }
            }
        }
        Err(Error::UnrecognizedFormat {
            path: path.to_path_buf(),
        })
    }

    /// Create a writer chosen by `path`'s extension, falling back to the
    /// first registered format.
    pub fn open_writer(
        &self,
        path: impl AsRef<Path>,
        spec: OutputSpec,
    ) -> Result<Box<dyn FrameSink>> {
        let path = path.as_ref();
        let format = self
            .formats
            .iter()
            .find(|f| f.matches_extension(path))
            .or_else(|| self.formats.first())
            .ok_or_else(|| Error::UnsupportedFormat("no audio formats registered".into()))?;
        tracing::debug!(path = %path.display(), format = format.name(), "creating audio sink");
        format.open_writer(path, spec)
    }
}

impl std::fmt::Debug for AudioFormatManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioFormatManager")
            .field("formats", &self.format_names())
            .finish()
    }
}
