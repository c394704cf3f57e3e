//! Audio file I/O for takehost.
//!
//! The offline pipeline never touches a codec directly. It asks an
//! [`AudioFormatManager`] for a [`FrameSource`] to pull blocks from and a
//! [`FrameSink`] to push processed blocks into.
//!
//! - **Frame streams**: [`FrameSource`] / [`FrameSink`] move planar
//!   [`AudioBuffer`](takehost_core::AudioBuffer) blocks in and out of files
//! - **WAV**: [`WavFormat`], streaming reads and writes through `hound`
//!   at 16/24-bit PCM or 32-bit float
//! - **Format manager**: [`AudioFormatManager`] detects readers by content
//!   and picks writers by file extension
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use takehost_core::AudioBuffer;
//! use takehost_io::{AudioFormatManager, BitDepth, OutputSpec};
//!
//! let formats = AudioFormatManager::with_basic_formats();
//! let mut source = formats.open_reader("take.wav")?;
//! let spec = OutputSpec::new(source.sample_rate() as u32, source.num_channels() as u16, BitDepth::Int16);
//! let mut sink = formats.open_writer("take.out.wav", spec)?;
//!
//! let mut buffer = AudioBuffer::new(source.num_channels(), 512);
//! loop {
//!     let frames = source.read_into(&mut buffer)?;
//!     if frames == 0 {
//!         break;
//!     }
//!     buffer.set_num_samples(frames);
//!     sink.write_from(&buffer)?;
//! }
//! sink.finalize()?;
//! # Ok::<(), takehost_io::Error>(())
//! ```

mod format;
mod stream;
mod wav;

pub use format::{AudioFormat, AudioFormatManager};
pub use stream::{BitDepth, FrameSink, FrameSource, OutputSpec};
pub use wav::{WavFormat, WavSink, WavSource};

use std::path::PathBuf;

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// No registered format can decode the file.
    #[error("unrecognized audio format: {}", path.display())]
    UnrecognizedFormat {
        /// The file that could not be decoded.
        path: PathBuf,
    },

    /// The requested output configuration is not supported.
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
