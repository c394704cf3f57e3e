//! Plugin capability traits.
//!
//! A hosting runtime provides two things: a [`PluginFormat`] that can find
//! plugin types inside a file and instantiate them, and the
//! [`PluginInstance`] handles it hands back. The host never looks inside a
//! plugin binary itself.

use std::path::{Path, PathBuf};

use crate::buffer::AudioBuffer;
use crate::layout::BusesLayout;
use crate::param::ParamDescriptor;

/// One concrete plugin type found inside a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescription {
    /// Display name of the plugin type.
    pub name: String,
    /// Name of the [`PluginFormat`] that produced this description.
    pub format_name: String,
    /// File (or bundle directory) the type lives in.
    pub path: PathBuf,
    /// Format-specific identifier that selects this type within the file.
    pub identifier: String,
    /// Channel count of the main input bus at instantiation.
    pub num_inputs: usize,
    /// Channel count of the main output bus at instantiation.
    pub num_outputs: usize,
}

/// A live, instantiated plugin processor.
///
/// The host drives an instance through a fixed lifecycle:
/// layout negotiation, [`prepare`](Self::prepare), [`reset`](Self::reset),
/// any number of [`process_block`](Self::process_block) calls, then
/// [`release_resources`](Self::release_resources).
pub trait PluginInstance: Send {
    /// Display name.
    fn name(&self) -> &str;

    /// The layout currently applied to the processor's buses.
    fn buses_layout(&self) -> BusesLayout;

    /// Try to apply a layout atomically.
    ///
    /// Returns `false` and keeps the previous layout if the processor rejects
    /// the request.
    fn set_buses_layout(&mut self, layout: &BusesLayout) -> bool;

    /// Tell the processor whether it runs offline.
    ///
    /// Offline processors may use higher-latency, higher-quality code paths.
    fn set_non_realtime(&mut self, non_realtime: bool);

    /// Allocate processing resources for a sample rate and maximum block size.
    fn prepare(&mut self, sample_rate: f64, max_block_size: usize);

    /// Clear internal processing state without changing parameters.
    fn reset(&mut self);

    /// Process the active region of `buffer` in place.
    fn process_block(&mut self, buffer: &mut AudioBuffer);

    /// Free everything acquired in [`prepare`](Self::prepare).
    fn release_resources(&mut self);

    /// Serialize the current state. The byte layout belongs to the plugin.
    fn state(&self) -> Vec<u8>;

    /// Restore state previously produced by [`state`](Self::state).
    ///
    /// Data the plugin does not understand is ignored; the host never learns
    /// whether the restore was accepted.
    fn set_state(&mut self, data: &[u8]);

    /// Processing latency in samples.
    fn latency_samples(&self) -> usize {
        0
    }

    /// Whether the plugin provides an editor surface.
    fn has_editor(&self) -> bool {
        false
    }

    /// Parameters exposed to the editor surface.
    fn params(&self) -> &[ParamDescriptor] {
        &[]
    }

    /// Current value of a parameter.
    fn param(&self, _index: usize) -> Option<f32> {
        None
    }

    /// Change a parameter. Out-of-range indices are ignored.
    fn set_param(&mut self, _index: usize, _value: f32) {}
}

/// A plugin binary format known to the host.
pub trait PluginFormat: Send + Sync {
    /// Unique format name (e.g. `"VST3"`, `"Bundle"`).
    fn name(&self) -> &str;

    /// Cheap check whether `path` might contain plugins of this format.
    fn file_might_contain(&self, path: &Path) -> bool;

    /// Enumerate every plugin type inside `path`.
    ///
    /// Unreadable or foreign files yield an empty list.
    fn find_types(&self, path: &Path) -> Vec<PluginDescription>;

    /// Create an instance of a type previously returned by
    /// [`find_types`](Self::find_types).
    ///
    /// On failure, returns the runtime's diagnostic message.
    fn instantiate(
        &self,
        description: &PluginDescription,
        sample_rate: f64,
        block_size: usize,
    ) -> Result<Box<dyn PluginInstance>, String>;
}
