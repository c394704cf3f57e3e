//! Channel sets and bus layouts.

use std::fmt;

/// The channel arrangement carried by one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelSet {
    /// Bus is present but carries no channels.
    Disabled,
    /// One channel.
    Mono,
    /// Left and right.
    Stereo,
    /// Any other channel count with no speaker assignment.
    Discrete(usize),
}

impl ChannelSet {
    /// The canonical channel set for a channel count.
    ///
    /// `0` maps to [`Disabled`](Self::Disabled), `1` to mono, `2` to stereo,
    /// and every larger count to a discrete set of that size.
    pub const fn canonical(num_channels: usize) -> Self {
        match num_channels {
            0 => ChannelSet::Disabled,
            1 => ChannelSet::Mono,
            2 => ChannelSet::Stereo,
            n => ChannelSet::Discrete(n),
        }
    }

    /// Number of channels in the set.
    pub const fn size(&self) -> usize {
        match self {
            ChannelSet::Disabled => 0,
            ChannelSet::Mono => 1,
            ChannelSet::Stereo => 2,
            ChannelSet::Discrete(n) => *n,
        }
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelSet::Disabled => write!(f, "disabled"),
            ChannelSet::Mono => write!(f, "mono"),
            ChannelSet::Stereo => write!(f, "stereo"),
            ChannelSet::Discrete(n) => write!(f, "discrete({n})"),
        }
    }
}

/// Channel sets for every input and output bus of a processor.
///
/// Index 0 is the main bus on each side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BusesLayout {
    /// Input buses, main bus first.
    pub inputs: Vec<ChannelSet>,
    /// Output buses, main bus first.
    pub outputs: Vec<ChannelSet>,
}

impl BusesLayout {
    /// One input and one output bus with the same channel set.
    pub fn single(set: ChannelSet) -> Self {
        Self {
            inputs: vec![set],
            outputs: vec![set],
        }
    }

    /// Channel count of the main input bus, or 0 without input buses.
    pub fn main_input_channels(&self) -> usize {
        self.inputs.first().map_or(0, ChannelSet::size)
    }

    /// Channel count of the main output bus, or 0 without output buses.
    pub fn main_output_channels(&self) -> usize {
        self.outputs.first().map_or(0, ChannelSet::size)
    }

    /// Copy of this layout with the main input and main output buses (where
    /// present) replaced by the canonical set for `num_channels`.
    ///
    /// Buses beyond the main one are left untouched.
    pub fn with_main_buses(&self, num_channels: usize) -> Self {
        let mut layout = self.clone();
        let set = ChannelSet::canonical(num_channels);
        if let Some(main) = layout.inputs.first_mut() {
            *main = set;
        }
        if let Some(main) = layout.outputs.first_mut() {
            *main = set;
        }
        layout
    }
}

impl fmt::Display for BusesLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |sets: &[ChannelSet]| {
            sets.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        };
        write!(f, "in[{}] out[{}]", join(&self.inputs), join(&self.outputs))
    }
}
