//! Streaming WAV reading and writing.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};
use takehost_core::AudioBuffer;

use crate::format::AudioFormat;
use crate::stream::{BitDepth, FrameSink, FrameSource, OutputSpec};
use crate::{Error, Result};

/// The WAV container, PCM or IEEE float.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavFormat;

impl AudioFormat for WavFormat {
    fn name(&self) -> &str {
        "WAV"
    }

    fn extensions(&self) -> &[&str] {
        &["wav", "wave"]
    }

    fn open_reader(&self, path: &Path) -> Result<Box<dyn FrameSource>> {
        Ok(Box::new(WavSource::open(path)?))
    }

    fn open_writer(&self, path: &Path, spec: OutputSpec) -> Result<Box<dyn FrameSink>> {
        Ok(Box::new(WavSink::create(path, spec)?))
    }
}

/// Reads a WAV file block by block.
pub struct WavSource {
    reader: WavReader<BufReader<File>>,
    sample_rate: f64,
    channels: usize,
    total_frames: u64,
}

impl WavSource {
    /// Open a WAV file and read its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let reader = WavReader::open(path)?;
        let spec = reader.spec();
        let channels = usize::from(spec.channels);
        if channels == 0 {
            return Err(Error::Wav(hound::Error::FormatError("zero channels")));
        }
        Ok(Self {
            sample_rate: f64::from(spec.sample_rate),
            channels,
            total_frames: u64::from(reader.duration()),
            reader,
        })
    }
}

/// Deinterleave up to `buffer.num_samples()` frames from `next`, then
/// zero-fill whatever was not read.
fn fill_block(
    buffer: &mut AudioBuffer,
    channels: usize,
    mut next: impl FnMut() -> Option<Result<f32>>,
) -> Result<usize> {
    let frames = buffer.num_samples();
    let writable = channels.min(buffer.num_channels());
    let mut read = 0;

    'frames: while read < frames {
        for ch in 0..channels {
            let Some(sample) = next() else {
                break 'frames;
            };
            let sample = sample?;
            if ch < writable {
                buffer.channel_mut(ch)[read] = sample;
            }
        }
        read += 1;
    }

    for (ch, samples) in buffer.channels_mut().enumerate() {
        let start = if ch < writable { read } else { 0 };
        samples[start..].fill(0.0);
    }
    Ok(read)
}

impl FrameSource for WavSource {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn num_channels(&self) -> usize {
        self.channels
    }

    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    fn read_into(&mut self, buffer: &mut AudioBuffer) -> Result<usize> {
        let spec = self.reader.spec();
        match spec.sample_format {
            SampleFormat::Float => {
                let mut samples = self.reader.samples::<f32>();
                fill_block(buffer, self.channels, || {
                    samples.next().map(|s| s.map_err(Error::from))
                })
            }
            SampleFormat::Int => {
                let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
                let mut samples = self.reader.samples::<i32>();
                fill_block(buffer, self.channels, || {
                    samples
                        .next()
                        .map(|s| s.map(|v| v as f32 / max_val).map_err(Error::from))
                })
            }
        }
    }
}

/// Writes a WAV file block by block.
pub struct WavSink {
    writer: WavWriter<BufWriter<File>>,
    channels: usize,
    bit_depth: BitDepth,
    interleaved: Vec<f32>,
}

impl WavSink {
    /// Create (or truncate) a WAV file.
    pub fn create(path: impl AsRef<Path>, spec: OutputSpec) -> Result<Self> {
        if spec.channels == 0 {
            return Err(Error::UnsupportedFormat("zero output channels".into()));
        }
        let hound_spec = hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bit_depth.bits(),
            sample_format: match spec.bit_depth {
                BitDepth::Float32 => SampleFormat::Float,
                BitDepth::Int16 | BitDepth::Int24 => SampleFormat::Int,
            },
        };
        Ok(Self {
            writer: WavWriter::create(path, hound_spec)?,
            channels: usize::from(spec.channels),
            bit_depth: spec.bit_depth,
            interleaved: Vec::new(),
        })
    }
}

impl FrameSink for WavSink {
    fn write_from(&mut self, buffer: &AudioBuffer) -> Result<()> {
        let frames = buffer.num_samples();
        self.interleaved.clear();
        self.interleaved.resize(frames * self.channels, 0.0);
        for (ch, samples) in buffer.channels().take(self.channels).enumerate() {
            for (frame, &sample) in samples.iter().enumerate() {
                self.interleaved[frame * self.channels + ch] = sample;
            }
        }

        if self.bit_depth == BitDepth::Float32 {
            for &sample in &self.interleaved {
                self.writer.write_sample(sample)?;
            }
        } else {
            let max_val = (1i32 << (self.bit_depth.bits() - 1)) as f32;
            for &sample in &self.interleaved {
                let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                self.writer.write_sample(int_sample)?;
            }
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn ramp(len: usize, scale: f32) -> Vec<f32> {
        (0..len).map(|i| (i as f32 / len as f32).sin() * scale).collect()
    }

    fn write_all(path: &Path, channels: Vec<Vec<f32>>, bit_depth: BitDepth) {
        let spec = OutputSpec::new(44100, channels.len() as u16, bit_depth);
        let mut sink = Box::new(WavSink::create(path, spec).unwrap());
        sink.write_from(&AudioBuffer::from_channels(channels)).unwrap();
        sink.finalize().unwrap();
    }

    #[test]
    fn roundtrip_f32_stereo() {
        let left = ramp(1000, 1.0);
        let right = ramp(1000, -0.5);
        let file = NamedTempFile::new().unwrap();
        write_all(file.path(), vec![left.clone(), right.clone()], BitDepth::Float32);

        let mut source = WavSource::open(file.path()).unwrap();
        assert_eq!(source.num_channels(), 2);
        assert_eq!(source.total_frames(), 1000);
        assert_eq!(source.sample_rate(), 44100.0);

        let mut buffer = AudioBuffer::new(2, 1000);
        assert_eq!(source.read_into(&mut buffer).unwrap(), 1000);
        assert_eq!(buffer.channel(0), left.as_slice());
        assert_eq!(buffer.channel(1), right.as_slice());
    }

    #[test]
    fn roundtrip_i16_within_quantization() {
        let samples = ramp(1000, 0.9);
        let file = NamedTempFile::new().unwrap();
        write_all(file.path(), vec![samples.clone()], BitDepth::Int16);

        let mut source = WavSource::open(file.path()).unwrap();
        let mut buffer = AudioBuffer::new(1, 1000);
        source.read_into(&mut buffer).unwrap();
        for (a, b) in samples.iter().zip(buffer.channel(0)) {
            assert!((a - b).abs() < 0.001);
        }
    }

    #[test]
    fn roundtrip_i24_is_finer_than_i16() {
        let samples = ramp(500, 0.7);
        let file = NamedTempFile::new().unwrap();
        write_all(file.path(), vec![samples.clone()], BitDepth::Int24);

        let mut source = WavSource::open(file.path()).unwrap();
        let mut buffer = AudioBuffer::new(1, 500);
        source.read_into(&mut buffer).unwrap();
        for (a, b) in samples.iter().zip(buffer.channel(0)) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn int_output_clamps_overs() {
        let file = NamedTempFile::new().unwrap();
        write_all(file.path(), vec![vec![2.0, -2.0]], BitDepth::Int16);

        let mut reader = WavReader::open(file.path()).unwrap();
        let raw: Vec<i32> = reader.samples::<i32>().map(|s| s.unwrap()).collect();
        assert_eq!(raw, vec![32767, -32768]);
    }

    #[test]
    fn short_final_read_is_zero_padded() {
        let file = NamedTempFile::new().unwrap();
        write_all(file.path(), vec![vec![0.5; 10]], BitDepth::Float32);

        let mut source = WavSource::open(file.path()).unwrap();
        let mut buffer = AudioBuffer::new(1, 8);
        assert_eq!(source.read_into(&mut buffer).unwrap(), 8);

        buffer.channel_mut(0).fill(9.0);
        assert_eq!(source.read_into(&mut buffer).unwrap(), 2);
        assert_eq!(buffer.channel(0), &[0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(source.read_into(&mut buffer).unwrap(), 0);
    }

    #[test]
    fn extra_buffer_channels_stay_silent() {
        let file = NamedTempFile::new().unwrap();
        write_all(file.path(), vec![vec![0.25; 4]], BitDepth::Float32);

        let mut source = WavSource::open(file.path()).unwrap();
        let mut buffer = AudioBuffer::new(2, 4);
        buffer.channel_mut(1).fill(1.0);
        source.read_into(&mut buffer).unwrap();
        assert_eq!(buffer.channel(0), &[0.25; 4]);
        assert_eq!(buffer.channel(1), &[0.0; 4]);
    }

    #[test]
    fn garbage_is_not_a_wav() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"definitely not RIFF").unwrap();
        assert!(matches!(WavSource::open(file.path()), Err(Error::Wav(_))));
    }
}
