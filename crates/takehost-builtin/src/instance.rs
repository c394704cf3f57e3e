//! Live instance of a built-in effect.

use std::collections::BTreeMap;

use takehost_core::{AudioBuffer, BusesLayout, ChannelSet, ParamDescriptor, PluginInstance};

use crate::effect::{ChannelState, EffectKind};

/// A built-in effect wrapped as a [`PluginInstance`].
///
/// Accepts any layout with exactly one input and one output bus of equal,
/// non-zero width. Buffer channels beyond the negotiated width pass through
/// untouched.
#[derive(Debug)]
pub struct BuiltinInstance {
    kind: EffectKind,
    name: String,
    values: Vec<f32>,
    layout: BusesLayout,
    sample_rate: f64,
    channels: Vec<ChannelState>,
    non_realtime: bool,
}

impl BuiltinInstance {
    /// Create a stereo instance with the given parameter values.
    ///
    /// Missing values take the parameter default; excess values are dropped.
    pub fn new(kind: EffectKind, name: impl Into<String>, values: &[f32]) -> Self {
        let values = kind
            .params()
            .iter()
            .enumerate()
            .map(|(i, p)| values.get(i).map_or(p.default, |&v| p.clamp(v)))
            .collect();
        Self {
            kind,
            name: name.into(),
            values,
            layout: BusesLayout::single(ChannelSet::Stereo),
            sample_rate: 44100.0,
            channels: Vec::new(),
            non_realtime: false,
        }
    }

    /// Which effect this instance runs.
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Whether the host flagged this instance as offline.
    pub fn is_non_realtime(&self) -> bool {
        self.non_realtime
    }

    fn reconfigure(&mut self) {
        for state in &mut self.channels {
            state.configure(self.kind, &self.values, self.sample_rate);
        }
    }
}

impl PluginInstance for BuiltinInstance {
    fn name(&self) -> &str {
        &self.name
    }

    fn buses_layout(&self) -> BusesLayout {
        self.layout.clone()
    }

    fn set_buses_layout(&mut self, layout: &BusesLayout) -> bool {
        let accepted = layout.inputs.len() == 1
            && layout.outputs.len() == 1
            && layout.inputs[0] == layout.outputs[0]
            && layout.inputs[0].size() > 0;
        if accepted {
            self.layout = layout.clone();
        }
        accepted
    }

    fn set_non_realtime(&mut self, non_realtime: bool) {
        self.non_realtime = non_realtime;
    }

    fn prepare(&mut self, sample_rate: f64, _max_block_size: usize) {
        self.sample_rate = sample_rate;
        let width = self.layout.main_output_channels();
        self.channels = (0..width)
            .map(|_| ChannelState::new(self.kind, &self.values, sample_rate))
            .collect();
    }

    fn reset(&mut self) {
        for state in &mut self.channels {
            state.clear();
        }
    }

    fn process_block(&mut self, buffer: &mut AudioBuffer) {
        for (state, samples) in self.channels.iter_mut().zip(buffer.channels_mut()) {
            state.process(samples);
        }
    }

    fn release_resources(&mut self) {
        self.channels.clear();
    }

    fn state(&self) -> Vec<u8> {
        let map: BTreeMap<&str, f32> = self
            .kind
            .params()
            .iter()
            .zip(&self.values)
            .map(|(p, &v)| (p.id, v))
            .collect();
        serde_json::to_vec(&map).unwrap_or_default()
    }

    fn set_state(&mut self, data: &[u8]) {
        let Ok(map) = serde_json::from_slice::<BTreeMap<String, f32>>(data) else {
            tracing::debug!(plugin = %self.name, "ignoring unrecognized state");
            return;
        };
        for (param, value) in self.kind.params().iter().zip(&mut self.values) {
            if let Some(&v) = map.get(param.id) {
                *value = param.clamp(v);
            }
        }
        self.reconfigure();
    }

    fn has_editor(&self) -> bool {
        !self.kind.params().is_empty()
    }

    fn params(&self) -> &[ParamDescriptor] {
        self.kind.params()
    }

    fn param(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(descriptor) = self.kind.params().get(index) else {
            return;
        };
        self.values[index] = descriptor.clamp(value);
        self.reconfigure();
    }
}
