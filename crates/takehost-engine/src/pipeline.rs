//! Offline block-by-block rendering of an input file through a chain.

use std::path::Path;

use takehost_config::ChainSpec;
use takehost_core::{AudioBuffer, FormatRegistry};
use takehost_io::{AudioFormatManager, BitDepth, FrameSink, FrameSource, OutputSpec};

use crate::error::HostError;
use crate::preset::apply_preset;
use crate::session::{PluginSession, SessionConfig};
use crate::{DEFAULT_BLOCK_SIZE, clamp_block_size};

/// Progress after one processed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockProgress {
    /// Zero-based block number.
    pub index: usize,
    /// Frame position at the start of the block.
    pub position: u64,
    /// Frames in the block.
    pub len: usize,
    /// Total frames in the run.
    pub total: u64,
}

impl BlockProgress {
    /// Frames processed so far, this block included.
    pub fn done(&self) -> u64 {
        self.position + self.len as u64
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Frames read, processed and written.
    pub total_samples: u64,
    /// Number of blocks processed.
    pub blocks: usize,
    /// Number of live plugin sessions (bypassed slots excluded).
    pub plugins: usize,
    /// Channels per frame.
    pub channels: usize,
    /// Sample rate of input and output.
    pub sample_rate: f64,
    /// Presets that could not be applied.
    pub preset_warnings: Vec<String>,
}

/// Lengths of the blocks a run over `total` frames is cut into.
///
/// Every block is `block_size` long except a shorter final one when `total`
/// is not a multiple of `block_size`.
pub fn block_lengths(total: u64, block_size: usize) -> impl Iterator<Item = usize> {
    let block = block_size.max(1) as u64;
    let mut position = 0u64;
    std::iter::from_fn(move || {
        if position >= total {
            return None;
        }
        let len = block.min(total - position);
        position += len;
        Some(len as usize)
    })
}

/// Renders audio files through a chain of plugin sessions.
#[derive(Debug)]
pub struct OfflinePipeline<'a> {
    registry: &'a FormatRegistry,
    formats: &'a AudioFormatManager,
    block_size: usize,
    bit_depth: BitDepth,
}

impl<'a> OfflinePipeline<'a> {
    /// Create a pipeline with the default block size and 16-bit output.
    pub fn new(registry: &'a FormatRegistry, formats: &'a AudioFormatManager) -> Self {
        Self {
            registry,
            formats,
            block_size: DEFAULT_BLOCK_SIZE,
            bit_depth: BitDepth::Int16,
        }
    }

    /// Set the block size. Values below the minimum are raised to it.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = clamp_block_size(block_size);
        self
    }

    /// Set the output sample encoding.
    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    /// Effective block size.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Render `input` through the chain described by the file `chain_path`.
    ///
    /// Checks run in a fixed order so each failure class is reported before
    /// any later one: input existence, chain existence, input decoding,
    /// chain validity, plugin loading, output creation.
    pub fn run_chain_file(
        &self,
        input: &Path,
        output: &Path,
        chain_path: &Path,
        on_block: impl FnMut(&BlockProgress),
    ) -> Result<RunReport, HostError> {
        if !input.is_file() {
            return Err(HostError::InputNotFound(input.to_path_buf()));
        }
        if !chain_path.is_file() {
            return Err(HostError::ChainNotFound(chain_path.to_path_buf()));
        }
        let source = self.open_input(input)?;
        let chain = ChainSpec::load(chain_path)?;
        self.process(source, input, output, &chain, on_block)
    }

    /// Render `input` through an already loaded chain.
    pub fn run(
        &self,
        input: &Path,
        output: &Path,
        chain: &ChainSpec,
        on_block: impl FnMut(&BlockProgress),
    ) -> Result<RunReport, HostError> {
        let source = self.open_input(input)?;
        self.process(source, input, output, chain, on_block)
    }

    fn open_input(&self, input: &Path) -> Result<Box<dyn FrameSource>, HostError> {
        self.formats.open_reader(input).map_err(|source| match source {
            takehost_io::Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound => {
                HostError::InputNotFound(input.to_path_buf())
            }
            source => HostError::InputRead {
                path: input.to_path_buf(),
                source,
            },
        })
    }

    /// Open one session per active slot, applying presets as they come.
    fn open_sessions(
        &self,
        chain: &ChainSpec,
        sample_rate: f64,
        block_size: usize,
        channels: usize,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<PluginSession>, HostError> {
        let config = SessionConfig::offline(sample_rate, block_size, channels);
        let mut sessions = Vec::new();
        for slot in chain.slots() {
            if slot.bypass {
                tracing::debug!(plugin = %slot.plugin_path.display(), "slot bypassed");
                continue;
            }
            let mut session = PluginSession::open(self.registry, &slot.plugin_path, config)?;
            if let Some(preset) = &slot.preset_path
                && let Err(e) = apply_preset(&mut session, preset)
            {
                tracing::warn!(plugin = session.name(), error = %e, "failed to apply preset");
                warnings.push(format!("failed to apply preset {}", preset.display()));
            }
            tracing::debug!(
                plugin = session.name(),
                latency = session.latency_samples(),
                "plugin latency"
            );
            sessions.push(session);
        }
        Ok(sessions)
    }

    fn process(
        &self,
        mut source: Box<dyn FrameSource>,
        input: &Path,
        output: &Path,
        chain: &ChainSpec,
        mut on_block: impl FnMut(&BlockProgress),
    ) -> Result<RunReport, HostError> {
        let sample_rate = source.sample_rate();
        let channels = source.num_channels();
        let total = source.total_frames();
        // A block longer than the whole take only costs memory.
        let block_size = usize::try_from(total)
            .map_or(self.block_size, |frames| self.block_size.min(clamp_block_size(frames)));

        let mut report = RunReport {
            total_samples: total,
            channels,
            sample_rate,
            ..RunReport::default()
        };
        let mut sessions = self.open_sessions(
            chain,
            sample_rate,
            block_size,
            channels,
            &mut report.preset_warnings,
        )?;
        report.plugins = sessions.len();

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| HostError::output_write(output, e))?;
        }
        let spec = OutputSpec::new(
            sample_rate.round() as u32,
            u16::try_from(channels).unwrap_or(u16::MAX),
            self.bit_depth,
        );
        let sink = self
            .formats
            .open_writer(output, spec)
            .map_err(|e| HostError::output_write(output, e))?;

        tracing::info!(
            frames = total,
            channels,
            sample_rate,
            block_size,
            plugins = sessions.len(),
            "rendering"
        );

        let mut render = |mut sink: Box<dyn FrameSink>| -> Result<usize, HostError> {
            let mut buffer = AudioBuffer::new(channels, block_size);
            let mut position = 0u64;
            let mut blocks = 0;
            for (index, len) in block_lengths(total, block_size).enumerate() {
                buffer.set_num_samples(len);
                buffer.clear();
                source
                    .read_into(&mut buffer)
                    .map_err(|source| HostError::InputRead {
                        path: input.to_path_buf(),
                        source,
                    })?;
                for session in &mut sessions {
                    session.process_block(&mut buffer);
                }
                sink.write_from(&buffer)
                    .map_err(|e| HostError::output_write(output, e))?;

                on_block(&BlockProgress {
                    index,
                    position,
                    len,
                    total,
                });
                position += len as u64;
                blocks = index + 1;
            }
            sink.finalize()
                .map_err(|e| HostError::output_write(output, e))?;
            Ok(blocks)
        };

        // The sink is closed once `render` returns, on success or failure.
        match render(sink) {
            Ok(blocks) => report.blocks = blocks,
            Err(e) => {
                discard_partial_output(output);
                return Err(e);
            }
        }

        for session in sessions {
            session.close();
        }
        tracing::info!(output = %output.display(), blocks = report.blocks, "render complete");
        Ok(report)
    }
}

/// Delete a render that stopped partway.
fn discard_partial_output(output: &Path) {
    match std::fs::remove_file(output) {
        Ok(()) => tracing::debug!(output = %output.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            output = %output.display(),
            error = %e,
            "could not remove partial output"
        ),
    }
}
