//! Plugin session lifecycle and preset persistence.

mod common;

use std::path::Path;

use common::registry;
use takehost_builtin::{BundleEntry, BundleManifest, EffectKind};
use takehost_core::{AudioBuffer, BusesLayout, ChannelSet, PluginError};
use takehost_engine::{
    PluginSession, PresetError, SessionConfig, apply_preset, save_preset,
};
use tempfile::TempDir;

fn gate_bundle(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("voice.thfx");
    BundleManifest::new()
        .with_plugin(BundleEntry::new(EffectKind::Gate))
        .with_plugin(BundleEntry::new(EffectKind::Gain))
        .save(&path)
        .unwrap();
    path
}

fn render(session: &mut PluginSession) -> Vec<f32> {
    let mut buffer = AudioBuffer::from_channels(vec![
        (0..512).map(|i| (i as f32 * 0.07).sin() * 0.3).collect(),
    ]);
    session.process_block(&mut buffer);
    buffer.channel(0).to_vec()
}

#[test]
fn first_discovered_type_wins() {
    let dir = TempDir::new().unwrap();
    let (registry, _) = registry();
    let session = PluginSession::open(
        &registry,
        &gate_bundle(&dir),
        SessionConfig::offline(48000.0, 512, 1),
    )
    .unwrap();
    assert_eq!(session.name(), "Noise Gate");
    assert_eq!(session.description().identifier, "0:gate");
}

#[test]
fn mono_layout_is_negotiated() {
    let dir = TempDir::new().unwrap();
    let (registry, _) = registry();
    let session = PluginSession::open(
        &registry,
        &gate_bundle(&dir),
        SessionConfig::offline(44100.0, 256, 1),
    )
    .unwrap();
    assert_eq!(session.buses_layout(), BusesLayout::single(ChannelSet::Mono));
    assert_eq!(session.channel_count(), 1);
    assert_eq!(session.block_size(), 256);
    assert_eq!(session.sample_rate(), 44100.0);
    assert_eq!(session.latency_samples(), 0);
    assert!(session.is_non_realtime());
}

#[test]
fn rejected_layout_keeps_previous_one() {
    let (registry, _) = registry();
    let session = PluginSession::open(
        &registry,
        Path::new("/fx/stubborn.mock"),
        SessionConfig::offline(48000.0, 512, 6),
    )
    .unwrap();
    assert_eq!(session.buses_layout(), BusesLayout::single(ChannelSet::Stereo));
}

#[test]
fn interactive_sessions_leave_realtime_flag_alone() {
    let (registry, journal) = registry();
    let session = PluginSession::open(
        &registry,
        Path::new("/fx/live.mock"),
        SessionConfig::interactive(48000.0, 32, 2),
    )
    .unwrap();
    assert!(!session.is_non_realtime());
    assert_eq!(session.block_size(), 64);
    assert!(journal.lock().non_realtime.is_empty());
}

#[test]
fn multi_type_file_uses_first_type() {
    let (registry, journal) = registry();
    let session = PluginSession::open(
        &registry,
        Path::new("/fx/multi.mock"),
        SessionConfig::offline(48000.0, 512, 2),
    )
    .unwrap();
    assert_eq!(session.name(), "multi-first");
    assert_eq!(journal.lock().instantiated, vec!["multi-first"]);
}

#[test]
fn discovery_failure_is_not_found() {
    let (registry, _) = registry();
    let err = PluginSession::open(
        &registry,
        Path::new("/fx/unknown.dll"),
        SessionConfig::offline(48000.0, 512, 2),
    )
    .unwrap_err();
    assert!(matches!(err, PluginError::NotFound { .. }));
}

#[test]
fn close_and_drop_release_exactly_once() {
    let (registry, journal) = registry();
    let config = SessionConfig::offline(48000.0, 512, 2);
    let closed = PluginSession::open(&registry, Path::new("/fx/closed.mock"), config).unwrap();
    closed.close();
    {
        let _dropped =
            PluginSession::open(&registry, Path::new("/fx/dropped.mock"), config).unwrap();
    }
    assert_eq!(journal.lock().released, vec!["closed", "dropped"]);
}

#[test]
fn empty_preset_path_is_a_no_op() {
    let (registry, _) = registry();
    let mut session = PluginSession::open(
        &registry,
        Path::new("/fx/a.mock"),
        SessionConfig::offline(48000.0, 512, 2),
    )
    .unwrap();
    session.set_state(b"keep");
    apply_preset(&mut session, Path::new("")).unwrap();
    assert_eq!(session.state(), b"keep");
}

#[test]
fn missing_preset_fails_and_leaves_defaults() {
    let dir = TempDir::new().unwrap();
    let (registry, _) = registry();
    let mut session = PluginSession::open(
        &registry,
        &gate_bundle(&dir),
        SessionConfig::offline(48000.0, 512, 1),
    )
    .unwrap();
    let defaults = session.state();

    let err = apply_preset(&mut session, &dir.path().join("absent.preset")).unwrap_err();
    assert!(matches!(err, PresetError::NotAFile(_)));
    assert!(matches!(
        apply_preset(&mut session, dir.path()),
        Err(PresetError::NotAFile(_))
    ));
    assert_eq!(session.state(), defaults);
}

#[test]
fn save_then_apply_restores_behavior() {
    let dir = TempDir::new().unwrap();
    let (registry, _) = registry();
    let bundle = gate_bundle(&dir);
    let config = SessionConfig::offline(48000.0, 512, 1);
    let preset = dir.path().join("presets").join("gate.preset");

    let mut tuned = PluginSession::open(&registry, &bundle, config).unwrap();
    tuned.set_param(0, -20.0);
    tuned.set_param(1, 40.0);
    save_preset(&tuned, &preset).unwrap();
    let expected = render(&mut tuned);

    let mut fresh = PluginSession::open(&registry, &bundle, config).unwrap();
    apply_preset(&mut fresh, &preset).unwrap();
    assert_eq!(fresh.param(0), Some(-20.0));
    assert_eq!(render(&mut fresh), expected);
}

#[test]
fn applying_same_bytes_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let (registry, _) = registry();
    let bundle = gate_bundle(&dir);
    let config = SessionConfig::offline(48000.0, 512, 1);
    let preset = dir.path().join("gate.preset");
    std::fs::write(&preset, br#"{"threshold_db": -35.0, "release_ms": 10.0}"#).unwrap();

    let outputs: Vec<Vec<f32>> = (0..2)
        .map(|_| {
            let mut session = PluginSession::open(&registry, &bundle, config).unwrap();
            apply_preset(&mut session, &preset).unwrap();
            render(&mut session)
        })
        .collect();
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn save_replaces_existing_preset() {
    let dir = TempDir::new().unwrap();
    let (registry, _) = registry();
    let preset = dir.path().join("p.preset");
    std::fs::write(&preset, b"old contents that are longer than the new ones").unwrap();

    let mut session = PluginSession::open(
        &registry,
        Path::new("/fx/a.mock"),
        SessionConfig::offline(48000.0, 512, 2),
    )
    .unwrap();
    session.set_state(b"new");
    save_preset(&session, &preset).unwrap();
    assert_eq!(std::fs::read(&preset).unwrap(), b"new");
}

#[test]
fn failed_save_keeps_existing_file() {
    let dir = TempDir::new().unwrap();
    let (registry, _) = registry();
    let mut session = PluginSession::open(
        &registry,
        Path::new("/fx/a.mock"),
        SessionConfig::offline(48000.0, 512, 2),
    )
    .unwrap();
    session.set_state(b"new");

    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"precious").unwrap();
    let err = save_preset(&session, &blocker.join("p.preset")).unwrap_err();
    assert!(matches!(err, PresetError::Write { .. }));
    assert_eq!(std::fs::read(&blocker).unwrap(), b"precious");

    assert!(matches!(
        save_preset(&session, Path::new("")),
        Err(PresetError::EmptyPath)
    ));
}
