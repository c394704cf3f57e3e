//! Plugin hosting engine for takehost.
//!
//! - **Sessions**: [`PluginSession`] turns a plugin file into a prepared
//!   processor (discovery, instantiation, layout negotiation, prepare, reset)
//!   and releases it on every exit path
//! - **Presets**: [`apply_preset`] / [`save_preset`] move a plugin's opaque
//!   state to and from disk
//! - **Offline pipeline**: [`OfflinePipeline`] renders an input file through
//!   a chain in fixed-size blocks
//! - **Batch**: [`BatchRunner`] processes many takes in place with backups
//!
//! Fatal failures are [`HostError`]s, each with a process exit code.
//! Preset failures are [`PresetError`]s and never abort a run.

mod batch;
mod error;
mod pipeline;
mod preset;
mod session;

pub use batch::{BACKUP_PREFIX, BatchError, BatchProgress, BatchReport, BatchRunner, temp_output_path};
pub use error::{HostError, PresetError};
pub use pipeline::{BlockProgress, OfflinePipeline, RunReport, block_lengths};
pub use preset::{apply_preset, save_preset};
pub use session::{PluginSession, SessionConfig, SessionMode};

/// Smallest block size a plugin is ever prepared with.
pub const MIN_BLOCK_SIZE: usize = 64;

/// Block size used when none is given.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Raise `block_size` to [`MIN_BLOCK_SIZE`] if it is smaller.
pub const fn clamp_block_size(block_size: usize) -> usize {
    if block_size < MIN_BLOCK_SIZE {
        MIN_BLOCK_SIZE
    } else {
        block_size
    }
}

/// Parse a block-size argument; usable as a clap `value_parser`.
///
/// Never fails: anything that is not a number counts as zero, and every
/// value is raised to the minimum block size.
pub fn parse_block_size(s: &str) -> Result<usize, String> {
    let requested = s.trim().parse::<i64>().unwrap_or(0).max(0);
    Ok(clamp_block_size(usize::try_from(requested).unwrap_or(usize::MAX)))
}
