//! Parameter metadata used to build editor surfaces.

/// Unit of a parameter value, used for display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamUnit {
    /// Decibels (dB).
    Decibels,
    /// Frequency in Hertz.
    Hertz,
    /// Time in milliseconds.
    Milliseconds,
    /// Plain ratio or factor.
    Ratio,
    /// No unit.
    #[default]
    None,
}

impl ParamUnit {
    /// Short suffix appended to formatted values.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Ratio | ParamUnit::None => "",
        }
    }
}

/// Describes one automatable plugin parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Stable identifier used in saved state (e.g. `"gain_db"`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Value after instantiation.
    pub default: f32,
}

impl ParamDescriptor {
    /// Clamp a value into `[min, max]`.
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Format a value with its unit suffix.
    pub fn format_value(&self, value: f32) -> String {
        match self.unit {
            ParamUnit::Hertz if value >= 1000.0 => format!("{:.2} kHz", value / 1000.0),
            _ => format!("{value:.1}{}", self.unit.suffix()),
        }
    }
}
