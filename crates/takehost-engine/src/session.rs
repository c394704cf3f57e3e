//! One plugin file turned into a prepared, owned processor.

use std::fmt;
use std::path::Path;

use takehost_core::{
    AudioBuffer, BusesLayout, FormatRegistry, ParamDescriptor, PluginDescription, PluginError,
    PluginInstance,
};

use crate::clamp_block_size;

/// How a session will be driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Rendering files. The plugin is told it runs non-realtime.
    #[default]
    Offline,
    /// Live editing. The realtime flag is left alone.
    Interactive,
}

/// Processing parameters for [`PluginSession::open`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Maximum block size, at least [`MIN_BLOCK_SIZE`](crate::MIN_BLOCK_SIZE).
    pub block_size: usize,
    /// Channels requested on the main input and output buses.
    pub channels: usize,
    /// Offline or interactive.
    pub mode: SessionMode,
}

impl SessionConfig {
    /// Offline configuration. The block size is clamped to the minimum.
    pub fn offline(sample_rate: f64, block_size: usize, channels: usize) -> Self {
        Self {
            sample_rate,
            block_size: clamp_block_size(block_size),
            channels,
            mode: SessionMode::Offline,
        }
    }

    /// Interactive configuration. The block size is clamped to the minimum.
    pub fn interactive(sample_rate: f64, block_size: usize, channels: usize) -> Self {
        Self {
            mode: SessionMode::Interactive,
            ..Self::offline(sample_rate, block_size, channels)
        }
    }
}

/// A prepared plugin instance and the settings it was prepared with.
///
/// Resources are released by [`close`](Self::close) or, failing that, on
/// drop, so every exit path tears the plugin down.
pub struct PluginSession {
    instance: Box<dyn PluginInstance>,
    description: PluginDescription,
    config: SessionConfig,
    released: bool,
}

impl PluginSession {
    /// Discover, instantiate and prepare the plugin in `path`.
    ///
    /// The first discovered type is used; any others are ignored. A rejected
    /// bus layout is not an error: the plugin keeps its previous layout.
    pub fn open(
        registry: &FormatRegistry,
        path: &Path,
        config: SessionConfig,
    ) -> Result<Self, PluginError> {
        let mut types = registry.find_types(path).into_iter();
        let description = types.next().ok_or_else(|| PluginError::not_found(path))?;
        let ignored: Vec<String> = types.map(|t| t.name).collect();
        if !ignored.is_empty() {
            tracing::warn!(
                plugin = %path.display(),
                selected = %description.name,
                ?ignored,
                "file contains several plugin types, using the first"
            );
        }

        let mut instance =
            registry.create_instance(&description, config.sample_rate, config.block_size)?;

        if config.mode == SessionMode::Offline {
            instance.set_non_realtime(true);
        }

        let requested = instance.buses_layout().with_main_buses(config.channels);
        if !instance.set_buses_layout(&requested) {
            tracing::warn!(
                plugin = %description.name,
                requested = %requested,
                kept = %instance.buses_layout(),
                "plugin rejected bus layout"
            );
        }

        instance.prepare(config.sample_rate, config.block_size);
        instance.reset();

        tracing::info!(
            plugin = %description.name,
            format = %description.format_name,
            sample_rate = config.sample_rate,
            block_size = config.block_size,
            layout = %instance.buses_layout(),
            "plugin prepared"
        );

        Ok(Self {
            instance,
            description,
            config,
            released: false,
        })
    }

    /// Display name of the plugin.
    pub fn name(&self) -> &str {
        self.instance.name()
    }

    /// The descriptor the session was created from.
    pub fn description(&self) -> &PluginDescription {
        &self.description
    }

    /// Reported processing latency in samples.
    pub fn latency_samples(&self) -> usize {
        self.instance.latency_samples()
    }

    /// Channel count requested during layout negotiation.
    pub fn channel_count(&self) -> usize {
        self.config.channels
    }

    /// Maximum block size the plugin was prepared for.
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// Sample rate the plugin was prepared at.
    pub fn sample_rate(&self) -> f64 {
        self.config.sample_rate
    }

    /// Whether the plugin was flagged as offline.
    pub fn is_non_realtime(&self) -> bool {
        self.config.mode == SessionMode::Offline
    }

    /// Bus layout in effect after negotiation.
    pub fn buses_layout(&self) -> BusesLayout {
        self.instance.buses_layout()
    }

    /// Process one block in place.
    pub fn process_block(&mut self, buffer: &mut AudioBuffer) {
        self.instance.process_block(buffer);
    }

    /// Current opaque plugin state.
    pub fn state(&self) -> Vec<u8> {
        self.instance.state()
    }

    /// Hand opaque state to the plugin.
    pub fn set_state(&mut self, data: &[u8]) {
        self.instance.set_state(data);
    }

    /// Whether the plugin exposes an editor.
    pub fn has_editor(&self) -> bool {
        self.instance.has_editor()
    }

    /// Parameters exposed to the editor.
    pub fn params(&self) -> &[ParamDescriptor] {
        self.instance.params()
    }

    /// Current value of a parameter.
    pub fn param(&self, index: usize) -> Option<f32> {
        self.instance.param(index)
    }

    /// Change a parameter.
    pub fn set_param(&mut self, index: usize, value: f32) {
        self.instance.set_param(index, value);
    }

    /// Release the plugin's processing resources.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.instance.release_resources();
            self.released = true;
            tracing::debug!(plugin = %self.description.name, "plugin released");
        }
    }
}

impl Drop for PluginSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for PluginSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginSession")
            .field("description", &self.description)
            .field("config", &self.config)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}
