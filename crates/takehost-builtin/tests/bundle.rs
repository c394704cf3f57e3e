//! Discovery and instantiation of `.thfx` bundles through a registry.

use std::path::Path;

use takehost_builtin::{BundleEntry, BundleFormat, BundleManifest, EffectKind, default_registry};
use takehost_core::{AudioBuffer, BusesLayout, ChannelSet, PluginError, PluginFormat};
use tempfile::TempDir;

fn write_bundle(dir: &TempDir, name: &str, manifest: &BundleManifest) -> std::path::PathBuf {
    let path = dir.path().join(name);
    manifest.save(&path).unwrap();
    path
}

#[test]
fn every_known_entry_becomes_a_type() {
    let dir = TempDir::new().unwrap();
    let manifest = BundleManifest::new()
        .with_plugin(BundleEntry::new(EffectKind::HighPass).with_name("Rumble Cut"))
        .with_plugin(BundleEntry {
            effect: "flanger".into(),
            name: None,
            params: Default::default(),
        })
        .with_plugin(BundleEntry::new(EffectKind::Gate));
    let path = write_bundle(&dir, "voice.thfx", &manifest);

    let types = default_registry().find_types(&path);
    let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Rumble Cut", "Noise Gate"]);
    assert_eq!(types[1].identifier, "2:gate");
    assert!(types.iter().all(|t| t.format_name == BundleFormat::NAME));
}

#[test]
fn unreadable_bundle_yields_no_types() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.thfx");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(default_registry().find_types(&path).is_empty());
    assert!(default_registry().find_types(Path::new("/nope/none.thfx")).is_empty());
}

#[test]
fn bundle_edited_after_discovery_fails_to_load() {
    let dir = TempDir::new().unwrap();
    let original = BundleManifest::new().with_plugin(BundleEntry::new(EffectKind::Gain));
    let path = write_bundle(&dir, "fx.thfx", &original);

    let registry = default_registry();
    let types = registry.find_types(&path);

    BundleManifest::new()
        .with_plugin(BundleEntry::new(EffectKind::Thru))
        .save(&path)
        .unwrap();

    match registry.create_instance(&types[0], 44100.0, 512) {
        Err(PluginError::Load { message, .. }) => assert!(message.contains("gain"), "{message}"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("stale description should not instantiate"),
    }
}

#[test]
fn instance_processes_mono_after_negotiation() {
    let dir = TempDir::new().unwrap();
    let manifest = BundleManifest::new()
        .with_plugin(BundleEntry::new(EffectKind::Gain).with_param("gain_db", -6.0206));
    let path = write_bundle(&dir, "trim.thfx", &manifest);

    let registry = default_registry();
    let types = registry.find_types(&path);
    let mut instance = registry.create_instance(&types[0], 44100.0, 64).unwrap();

    let mono = BusesLayout::single(ChannelSet::canonical(1));
    assert!(instance.set_buses_layout(&mono));
    instance.prepare(44100.0, 64);
    instance.reset();

    let mut buffer = AudioBuffer::from_channels(vec![vec![0.8; 64]]);
    instance.process_block(&mut buffer);
    assert!(buffer.channel(0).iter().all(|s| (s - 0.4).abs() < 1e-3));
    instance.release_resources();
}

#[test]
fn filters_survive_a_one_hertz_take() {
    let dir = TempDir::new().unwrap();
    let manifest = BundleManifest::new()
        .with_plugin(BundleEntry::new(EffectKind::HighPass))
        .with_plugin(BundleEntry::new(EffectKind::LowPass));
    let path = write_bundle(&dir, "eq.thfx", &manifest);

    let registry = default_registry();
    for description in registry.find_types(&path) {
        let mut instance = registry.create_instance(&description, 1.0, 100).unwrap();
        assert!(instance.set_buses_layout(&BusesLayout::single(ChannelSet::canonical(1))));
        instance.prepare(1.0, 100);
        instance.reset();

        let mut buffer = AudioBuffer::from_channels(vec![vec![0.5; 100]]);
        instance.process_block(&mut buffer);
        assert!(buffer.channel(0).iter().all(|s| s.is_finite()), "{}", description.name);
        instance.release_resources();
    }
}

#[test]
fn format_ignores_foreign_extensions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plugin.vst3");
    std::fs::write(&path, r#"{"plugins":[{"effect":"gain"}]}"#).unwrap();
    assert!(!BundleFormat::new().file_might_contain(&path));
    assert!(default_registry().find_types(&path).is_empty());
}
