//! Command line and start-up of an editor session.

use std::path::PathBuf;

use clap::Parser;
use takehost_core::{FormatRegistry, PluginError};
use takehost_engine::{
    DEFAULT_BLOCK_SIZE, PluginSession, SessionConfig, apply_preset, parse_block_size,
};
use thiserror::Error;

use crate::editor::EditorSession;

/// Channels the editor negotiates with the plugin.
const EDITOR_CHANNELS: usize = 2;

/// Hint appended to argument errors.
pub const USAGE: &str =
    "Usage:\n  takehost-gui --plugin <file> [--preset <file>] [--save <file>] [--block <size>]";

/// takehost plugin editor.
#[derive(Parser, Debug, Clone)]
#[command(name = "takehost-gui")]
#[command(about = "Edit a plugin's settings and save them as a preset")]
#[command(version)]
pub struct LaunchArgs {
    /// Plugin file to open
    #[arg(long, value_name = "FILE")]
    pub plugin: Option<PathBuf>,

    /// Preset to load after the plugin is prepared
    #[arg(long, value_name = "FILE")]
    pub preset: Option<PathBuf>,

    /// Preset file that Save writes to
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// Processing block size (minimum 64)
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE, value_parser = parse_block_size, allow_negative_numbers = true)]
    pub block: usize,

    /// Sample rate the plugin is prepared with
    #[arg(long, default_value = "44100", allow_negative_numbers = true)]
    pub sample_rate: f64,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Start-up failures. Each ends the application with its exit code.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// No plugin was given or the command line did not parse.
    #[error("Invalid arguments.\n\n{0}")]
    InvalidArguments(String),

    /// The plugin file does not exist.
    #[error("Plugin file not found: {}", .0.display())]
    PluginMissing(PathBuf),

    /// The plugin exists but could not be loaded.
    #[error("{0}")]
    Load(#[from] PluginError),
}

impl LaunchError {
    /// Process exit code for this failure.
    pub const fn exit_code(&self) -> u8 {
        match self {
            LaunchError::InvalidArguments(_) => 2,
            LaunchError::PluginMissing(_) => 3,
            LaunchError::Load(_) => 4,
        }
    }
}

/// Open the plugin named by `args` and wrap it in an editor session.
///
/// Argument problems (no plugin, a sample rate that is not a positive
/// number) are reported before the plugin file is looked at.
///
/// An initial preset that is missing or unreadable only leaves the plugin
/// at its defaults and queues a warning for the window.
pub fn launch(registry: &FormatRegistry, args: &LaunchArgs) -> Result<EditorSession, LaunchError> {
    let plugin = args
        .plugin
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| LaunchError::InvalidArguments(format!("Use --plugin <file> to open a plugin.\n\n{USAGE}")))?;
    if !(args.sample_rate.is_finite() && args.sample_rate > 0.0) {
        return Err(LaunchError::InvalidArguments(format!(
            "Sample rate must be a positive number of Hz, got {}.\n\n{USAGE}",
            args.sample_rate
        )));
    }
    if !plugin.exists() {
        return Err(LaunchError::PluginMissing(plugin.clone()));
    }

    let config = SessionConfig::interactive(args.sample_rate, args.block, EDITOR_CHANNELS);
    let mut session = PluginSession::open(registry, plugin, config)?;

    let mut warning = None;
    if let Some(preset) = &args.preset {
        match apply_preset(&mut session, preset) {
            Ok(()) => tracing::info!(preset = %preset.display(), "preset loaded"),
            Err(e) => {
                tracing::warn!(preset = %preset.display(), error = %e, "initial preset not applied");
                warning = Some(format!("Failed to load preset.\n\n{e}"));
            }
        }
    }

    let mut editor = EditorSession::new(session, args.save.clone());
    if let Some(message) = warning {
        editor.push_warning(message);
    }
    Ok(editor)
}
