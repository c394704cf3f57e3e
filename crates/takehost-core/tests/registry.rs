//! Integration tests for format discovery and instantiation dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use takehost_core::{
    AudioBuffer, BusesLayout, ChannelSet, FormatRegistry, PluginDescription, PluginError,
    PluginFormat, PluginInstance,
};

/// A format that claims files by extension and reports a fixed set of types.
struct MockFormat {
    name: &'static str,
    extension: &'static str,
    types: Vec<&'static str>,
    fail_instantiate: bool,
    enumerated: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFormat {
    fn new(name: &'static str, extension: &'static str, types: Vec<&'static str>) -> Self {
        Self {
            name,
            extension,
            types,
            fail_instantiate: false,
            enumerated: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

struct NullInstance(String);

impl PluginInstance for NullInstance {
    fn name(&self) -> &str {
        &self.0
    }
    fn buses_layout(&self) -> BusesLayout {
        BusesLayout::single(ChannelSet::Stereo)
    }
    fn set_buses_layout(&mut self, _layout: &BusesLayout) -> bool {
        false
    }
    fn set_non_realtime(&mut self, _non_realtime: bool) {}
    fn prepare(&mut self, _sample_rate: f64, _max_block_size: usize) {}
    fn reset(&mut self) {}
    fn process_block(&mut self, _buffer: &mut AudioBuffer) {}
    fn release_resources(&mut self) {}
    fn state(&self) -> Vec<u8> {
        Vec::new()
    }
    fn set_state(&mut self, _data: &[u8]) {}
}

impl PluginFormat for MockFormat {
    fn name(&self) -> &str {
        self.name
    }

    fn file_might_contain(&self, path: &Path) -> bool {
        path.extension().is_some_and(|e| e == self.extension)
    }

    fn find_types(&self, path: &Path) -> Vec<PluginDescription> {
        self.enumerated.lock().push(path.to_path_buf());
        self.types
            .iter()
            .map(|t| PluginDescription {
                name: (*t).to_string(),
                format_name: self.name.to_string(),
                path: path.to_path_buf(),
                identifier: (*t).to_string(),
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
        if self.fail_instantiate {
            return Err("runtime refused".to_string());
        }
        Ok(Box::new(NullInstance(description.name.clone())))
    }
}

#[test]
fn discovery_aggregates_across_matching_formats() {
    let registry = FormatRegistry::new()
        .with_format(MockFormat::new("A", "fx", vec!["a1", "a2"]))
        .with_format(MockFormat::new("B", "fx", vec!["b1"]))
        .with_format(MockFormat::new("C", "other", vec!["c1"]));

    let types = registry.find_types(Path::new("/plugins/voice.fx"));
    let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["a1", "a2", "b1"]);
    assert_eq!(types[2].format_name, "B");
}

#[test]
fn non_matching_formats_are_not_asked_to_enumerate() {
    let skipped = MockFormat::new("Skipped", "vst3", vec!["x"]);
    let log = Arc::clone(&skipped.enumerated);
    let registry = FormatRegistry::new().with_format(skipped);

    assert!(registry.find_types(Path::new("/plugins/voice.fx")).is_empty());
    assert!(log.lock().is_empty());
}

#[test]
fn create_instance_dispatches_to_owning_format() {
    let registry = FormatRegistry::new()
        .with_format(MockFormat::new("A", "fx", vec!["a1"]))
        .with_format(MockFormat::new("B", "fx", vec!["b1"]));

    let types = registry.find_types(Path::new("/plugins/voice.fx"));
    let instance = registry.create_instance(&types[1], 48000.0, 512).unwrap();
    assert_eq!(instance.name(), "b1");
}

#[test]
fn instantiate_failure_carries_runtime_message() {
    let mut format = MockFormat::new("A", "fx", vec!["a1"]);
    format.fail_instantiate = true;
    let registry = FormatRegistry::new().with_format(format);

    let types = registry.find_types(Path::new("/plugins/voice.fx"));
    let err = registry.create_instance(&types[0], 48000.0, 512).err().unwrap();
    match err {
        PluginError::Load { path, message } => {
            assert_eq!(path, Path::new("/plugins/voice.fx"));
            assert_eq!(message, "runtime refused");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unknown_format_is_reported() {
    let registry = FormatRegistry::new();
    let description = PluginDescription {
        name: "ghost".into(),
        format_name: "Nope".into(),
        path: "/plugins/ghost.fx".into(),
        identifier: "ghost".into(),
        num_inputs: 1,
        num_outputs: 1,
    };
    let err = registry.create_instance(&description, 44100.0, 64).err().unwrap();
    assert!(matches!(err, PluginError::UnknownFormat(ref f) if f == "Nope"));
}
