//! The catalog of built-in effects.

use takehost_core::{ParamDescriptor, ParamUnit};

use crate::dsp::{Biquad, FilterShape, GateState, db_to_linear};

const GAIN_PARAMS: &[ParamDescriptor] = &[ParamDescriptor {
    id: "gain_db",
    name: "Gain",
    unit: ParamUnit::Decibels,
    min: -60.0,
    max: 24.0,
    default: 0.0,
}];

const HIGHPASS_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor {
        id: "cutoff_hz",
        name: "Cutoff",
        unit: ParamUnit::Hertz,
        min: 20.0,
        max: 2000.0,
        default: 80.0,
    },
    ParamDescriptor {
        id: "q",
        name: "Q",
        unit: ParamUnit::Ratio,
        min: 0.1,
        max: 10.0,
        default: 0.707,
    },
];

const LOWPASS_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor {
        id: "cutoff_hz",
        name: "Cutoff",
        unit: ParamUnit::Hertz,
        min: 200.0,
        max: 20000.0,
        default: 12000.0,
    },
    ParamDescriptor {
        id: "q",
        name: "Q",
        unit: ParamUnit::Ratio,
        min: 0.1,
        max: 10.0,
        default: 0.707,
    },
];

const GATE_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor {
        id: "threshold_db",
        name: "Threshold",
        unit: ParamUnit::Decibels,
        min: -90.0,
        max: 0.0,
        default: -50.0,
    },
    ParamDescriptor {
        id: "release_ms",
        name: "Release",
        unit: ParamUnit::Milliseconds,
        min: 5.0,
        max: 2000.0,
        default: 120.0,
    },
];

/// One of the effects a bundle can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Static gain.
    Gain,
    /// Second-order high-pass filter.
    HighPass,
    /// Second-order low-pass filter.
    LowPass,
    /// Noise gate.
    Gate,
    /// Passthrough with no parameters and no editor.
    Thru,
}

impl EffectKind {
    /// Every effect, in catalog order.
    pub const ALL: [EffectKind; 5] = [
        EffectKind::Gain,
        EffectKind::HighPass,
        EffectKind::LowPass,
        EffectKind::Gate,
        EffectKind::Thru,
    ];

    /// Identifier used in bundle manifests.
    pub const fn id(self) -> &'static str {
        match self {
            EffectKind::Gain => "gain",
            EffectKind::HighPass => "highpass",
            EffectKind::LowPass => "lowpass",
            EffectKind::Gate => "gate",
            EffectKind::Thru => "thru",
        }
    }

    /// Parse a manifest identifier (case-insensitive).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id.trim()))
    }

    /// Human-readable default name.
    pub const fn display_name(self) -> &'static str {
        match self {
            EffectKind::Gain => "Gain",
            EffectKind::HighPass => "High-Pass Filter",
            EffectKind::LowPass => "Low-Pass Filter",
            EffectKind::Gate => "Noise Gate",
            EffectKind::Thru => "Thru",
        }
    }

    /// Parameter metadata.
    pub const fn params(self) -> &'static [ParamDescriptor] {
        match self {
            EffectKind::Gain => GAIN_PARAMS,
            EffectKind::HighPass => HIGHPASS_PARAMS,
            EffectKind::LowPass => LOWPASS_PARAMS,
            EffectKind::Gate => GATE_PARAMS,
            EffectKind::Thru => &[],
        }
    }

    /// Default parameter values.
    pub fn default_values(self) -> Vec<f32> {
        self.params().iter().map(|p| p.default).collect()
    }
}

/// Per-channel processing state for one effect.
#[derive(Debug, Clone)]
pub(crate) enum ChannelState {
    Gain(f32),
    Filter(Biquad),
    Gate(GateState),
    Thru,
}

impl ChannelState {
    /// Fresh state configured from the current parameter values.
    pub(crate) fn new(kind: EffectKind, values: &[f32], sample_rate: f64) -> Self {
        let mut state = match kind {
            EffectKind::Gain => ChannelState::Gain(1.0),
            EffectKind::HighPass | EffectKind::LowPass => ChannelState::Filter(Biquad::new()),
            EffectKind::Gate => ChannelState::Gate(GateState::new()),
            EffectKind::Thru => ChannelState::Thru,
        };
        state.configure(kind, values, sample_rate);
        state
    }

    /// Apply parameter values without touching filter memory.
    pub(crate) fn configure(&mut self, kind: EffectKind, values: &[f32], sample_rate: f64) {
        let value = |i: usize| values.get(i).copied().unwrap_or(kind.params()[i].default);
        match (self, kind) {
            (ChannelState::Gain(gain), EffectKind::Gain) => *gain = db_to_linear(value(0)),
            (ChannelState::Filter(filter), EffectKind::HighPass) => {
                filter.configure(FilterShape::HighPass, value(0), value(1), sample_rate);
            }
            (ChannelState::Filter(filter), EffectKind::LowPass) => {
                filter.configure(FilterShape::LowPass, value(0), value(1), sample_rate);
            }
            (ChannelState::Gate(gate), EffectKind::Gate) => {
                gate.configure(value(0), value(1), sample_rate);
            }
            _ => {}
        }
    }

    pub(crate) fn process(&mut self, samples: &mut [f32]) {
        match self {
            ChannelState::Gain(gain) => {
                let gain = *gain;
                for s in samples {
                    *s *= gain;
                }
            }
            ChannelState::Filter(filter) => {
                for s in samples {
                    *s = filter.process(*s);
                }
            }
            ChannelState::Gate(gate) => {
                for s in samples {
                    *s = gate.process(*s);
                }
            }
            ChannelState::Thru => {}
        }
    }

    pub(crate) fn clear(&mut self) {
        match self {
            ChannelState::Filter(filter) => filter.clear(),
            ChannelState::Gate(gate) => gate.clear(),
            ChannelState::Gain(_) | ChannelState::Thru => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for kind in EffectKind::ALL {
            assert_eq!(EffectKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(EffectKind::from_id(" HighPass "), Some(EffectKind::HighPass));
        assert_eq!(EffectKind::from_id("reverb"), None);
    }

    #[test]
    fn defaults_are_within_range() {
        for kind in EffectKind::ALL {
            for param in kind.params() {
                assert!(param.min <= param.default && param.default <= param.max, "{}", param.id);
            }
        }
    }

    #[test]
    fn thru_has_no_params() {
        assert!(EffectKind::Thru.params().is_empty());
        assert!(EffectKind::Thru.default_values().is_empty());
    }

    #[test]
    fn gain_state_scales_samples() {
        let mut state = ChannelState::new(EffectKind::Gain, &[-6.0206], 48000.0);
        let mut samples = [1.0, -0.5];
        state.process(&mut samples);
        assert!((samples[0] - 0.5).abs() < 1e-3);
        assert!((samples[1] + 0.25).abs() < 1e-3);
    }
}
