//! Frame source and sink abstractions.

use takehost_core::AudioBuffer;

use crate::Result;

/// Sample encoding of a written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// 16-bit signed PCM.
    #[default]
    Int16,
    /// 24-bit signed PCM.
    Int24,
    /// 32-bit IEEE float.
    Float32,
}

impl BitDepth {
    /// Bits per sample.
    pub const fn bits(self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Float32 => 32,
        }
    }

    /// Parse a bit count (16, 24 or 32).
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            16 => Some(BitDepth::Int16),
            24 => Some(BitDepth::Int24),
            32 => Some(BitDepth::Float32),
            _ => None,
        }
    }
}

/// Shape of an output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample encoding.
    pub bit_depth: BitDepth,
}

impl OutputSpec {
    /// Create an output spec.
    pub const fn new(sample_rate: u32, channels: u16, bit_depth: BitDepth) -> Self {
        Self {
            sample_rate,
            channels,
            bit_depth,
        }
    }
}

/// A stream of audio frames read from a file.
pub trait FrameSource {
    /// Sample rate in Hz.
    fn sample_rate(&self) -> f64;

    /// Number of channels per frame.
    fn num_channels(&self) -> usize;

    /// Total number of frames in the stream.
    fn total_frames(&self) -> u64;

    /// Read the next `buffer.num_samples()` frames into the buffer.
    ///
    /// Frames past the end of the stream are zero-filled. Source channels the
    /// buffer has no room for are dropped; buffer channels the source does
    /// not have stay silent. Returns the number of frames actually read.
    fn read_into(&mut self, buffer: &mut AudioBuffer) -> Result<usize>;
}

/// A destination for processed audio frames.
pub trait FrameSink {
    /// Append the active region of `buffer`.
    fn write_from(&mut self, buffer: &AudioBuffer) -> Result<()>;

    /// Flush and close the file. Until this returns `Ok`, the file may be
    /// incomplete.
    fn finalize(self: Box<Self>) -> Result<()>;
}
