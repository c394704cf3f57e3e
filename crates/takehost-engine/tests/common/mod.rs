//! Shared fixtures: a recording mock plugin format and WAV helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use takehost_core::{
    AudioBuffer, BusesLayout, ChannelSet, FormatRegistry, PluginDescription, PluginFormat,
    PluginInstance,
};

/// Everything the mock plugins did, in order.
#[derive(Debug, Default)]
pub struct Journal {
    /// Names of instantiated plugins.
    pub instantiated: Vec<String>,
    /// `(plugin, block_len)` for every processed block.
    pub processed: Vec<(String, usize)>,
    /// Names of plugins whose resources were released.
    pub released: Vec<String>,
    /// `(plugin, non_realtime)` calls.
    pub non_realtime: Vec<(String, bool)>,
    /// `(plugin, sample_rate, block_size)` passed to prepare.
    pub prepared: Vec<(String, f64, usize)>,
    /// Names of plugins that were reset.
    pub reset: Vec<String>,
}

pub type SharedJournal = Arc<Mutex<Journal>>;

/// Claims `*.mock` files. The file stem names the plugin; a file whose stem
/// starts with `multi` reports two types, `broken` fails to instantiate,
/// `stubborn` rejects every layout, and `empty` has no types at all.
pub struct MockFormat {
    pub journal: SharedJournal,
}

impl MockFormat {
    pub fn new() -> (Self, SharedJournal) {
        let journal = SharedJournal::default();
        (
            Self {
                journal: Arc::clone(&journal),
            },
            journal,
        )
    }
}

pub struct MockInstance {
    name: String,
    journal: SharedJournal,
    layout: BusesLayout,
    accepts_layouts: bool,
    /// Added to every sample so chain order is audible.
    offset: f32,
    state: Vec<u8>,
}

impl PluginInstance for MockInstance {
    fn name(&self) -> &str {
        &self.name
    }

    fn buses_layout(&self) -> BusesLayout {
        self.layout.clone()
    }

    fn set_buses_layout(&mut self, layout: &BusesLayout) -> bool {
        if self.accepts_layouts {
            self.layout = layout.clone();
        }
        self.accepts_layouts
    }

    fn set_non_realtime(&mut self, non_realtime: bool) {
        self.journal
            .lock()
            .non_realtime
            .push((self.name.clone(), non_realtime));
    }

    fn prepare(&mut self, sample_rate: f64, max_block_size: usize) {
        self.journal
            .lock()
            .prepared
            .push((self.name.clone(), sample_rate, max_block_size));
    }

    fn reset(&mut self) {
        self.journal.lock().reset.push(self.name.clone());
    }

    fn process_block(&mut self, buffer: &mut AudioBuffer) {
        self.journal
            .lock()
            .processed
            .push((self.name.clone(), buffer.num_samples()));
        for channel in buffer.channels_mut() {
            for s in channel {
                *s = *s * 0.5 + self.offset;
            }
        }
    }

    fn release_resources(&mut self) {
        self.journal.lock().released.push(self.name.clone());
    }

    fn state(&self) -> Vec<u8> {
        self.state.clone()
    }

    fn set_state(&mut self, data: &[u8]) {
        self.state = data.to_vec();
    }
}

impl PluginFormat for MockFormat {
    fn name(&self) -> &str {
        "Mock"
    }

    fn file_might_contain(&self, path: &Path) -> bool {
        path.extension().is_some_and(|e| e == "mock")
    }

    fn find_types(&self, path: &Path) -> Vec<PluginDescription> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem.starts_with("empty") {
            return Vec::new();
        }
        let names = if stem.starts_with("multi") {
            vec![format!("{stem}-first"), format!("{stem}-second")]
        } else {
            vec![stem]
        };
        names
            .into_iter()
            .map(|name| PluginDescription {
                identifier: name.clone(),
                name,
                format_name: "Mock".into(),
                path: path.to_path_buf(),
                num_inputs: 2,
                num_outputs: 2,
            })
            .collect()
    }

    fn instantiate(
        &self,
        description: &PluginDescription,
        _sample_rate: f64,
        _block_size: usize,
    ) -> Result<Box<dyn PluginInstance>, String> {
        if description.name.starts_with("broken") {
            return Err("entry point missing".into());
        }
        self.journal
            .lock()
            .instantiated
            .push(description.name.clone());
        let offset = description
            .name
            .bytes()
            .last()
            .map_or(0.0, |b| f32::from(b % 10) * 0.01);
        Ok(Box::new(MockInstance {
            name: description.name.clone(),
            journal: Arc::clone(&self.journal),
            layout: BusesLayout::single(ChannelSet::Stereo),
            accepts_layouts: !description.name.starts_with("stubborn"),
            offset,
            state: Vec::new(),
        }))
    }
}

/// A registry with the mock format followed by the built-in formats.
pub fn registry() -> (FormatRegistry, SharedJournal) {
    let (format, journal) = MockFormat::new();
    let mut registry = FormatRegistry::new().with_format(format);
    takehost_builtin::register_builtin_formats(&mut registry);
    (registry, journal)
}

/// Write a float WAV of `frames` frames per channel.
pub fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: usize) -> PathBuf {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let value = (i as f32 * 0.05).sin() * 0.5;
        for _ in 0..channels {
            writer.write_sample(value).unwrap();
        }
    }
    writer.finalize().unwrap();
    path.to_path_buf()
}

/// All samples of a WAV file as f32, interleaved.
pub fn read_wav(path: &Path) -> (hound::WavSpec, Vec<f32>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().map(Result::unwrap).collect(),
        hound::SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.unwrap() as f32 / max)
                .collect()
        }
    };
    (spec, samples)
}

/// Write a chain file listing `entries` as `(path, preset, bypass)`.
pub fn write_chain(path: &Path, entries: &[(&str, &str, bool)]) -> PathBuf {
    let plugins: Vec<serde_json::Value> = entries
        .iter()
        .map(|(plugin, preset, bypass)| {
            serde_json::json!({ "path": plugin, "preset": preset, "bypass": bypass })
        })
        .collect();
    let doc = serde_json::json!({ "version": 1, "plugins": plugins });
    std::fs::write(path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    path.to_path_buf()
}
