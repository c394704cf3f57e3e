//! Core types for the takehost plugin host.
//!
//! This crate defines the vocabulary shared by every other takehost crate:
//!
//! - **Audio buffers**: [`AudioBuffer`], planar `f32` storage with an active
//!   block length that never exceeds its allocated capacity
//! - **Bus layouts**: [`ChannelSet`] and [`BusesLayout`] for channel-layout
//!   negotiation between the host and a plugin
//! - **Plugin capability**: the [`PluginFormat`] and [`PluginInstance`] traits
//!   that a hosting runtime implements
//! - **Format registry**: [`FormatRegistry`], an explicitly constructed list of
//!   formats that aggregates discovery and dispatches instantiation
//!
//! Nothing here knows about a concrete plugin binary format. Formats are
//! registered at startup and the registry is passed by reference to whoever
//! needs it.
//!
//! # Example
//!
//! ```rust
//! use takehost_core::{AudioBuffer, BusesLayout, ChannelSet};
//!
//! let mut buffer = AudioBuffer::new(2, 512);
//! buffer.set_num_samples(184);
//! assert_eq!(buffer.channel(0).len(), 184);
//!
//! let layout = BusesLayout::single(ChannelSet::canonical(2));
//! assert_eq!(layout.main_input_channels(), 2);
//! ```

mod buffer;
mod error;
mod layout;
mod param;
mod plugin;
mod registry;

pub use buffer::AudioBuffer;
pub use error::PluginError;
pub use layout::{BusesLayout, ChannelSet};
pub use param::{ParamDescriptor, ParamUnit};
pub use plugin::{PluginDescription, PluginFormat, PluginInstance};
pub use registry::FormatRegistry;
