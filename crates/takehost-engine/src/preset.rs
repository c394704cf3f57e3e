//! Preset files: a plugin's opaque state, byte for byte.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::PresetError;
use crate::session::PluginSession;

/// Restore a session's state from a preset file.
///
/// An empty path is a successful no-op. The plugin decides what to do with
/// the bytes; whether it accepted them is not observable.
pub fn apply_preset(session: &mut PluginSession, path: &Path) -> Result<(), PresetError> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    if !path.is_file() {
        return Err(PresetError::NotAFile(path.to_path_buf()));
    }
    let data = std::fs::read(path).map_err(|source| PresetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    session.set_state(&data);
    tracing::debug!(
        plugin = session.name(),
        preset = %path.display(),
        bytes = data.len(),
        "preset applied"
    );
    Ok(())
}

/// Write a session's current state to a preset file.
///
/// The bytes go to a temporary file next to the destination, which is then
/// renamed over it. A failed save leaves any existing preset untouched.
pub fn save_preset(session: &PluginSession, path: &Path) -> Result<(), PresetError> {
    if path.as_os_str().is_empty() {
        return Err(PresetError::EmptyPath);
    }
    let write_err = |source: std::io::Error| PresetError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }

    let data = session.state();
    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(&data).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    tracing::info!(
        plugin = session.name(),
        preset = %path.display(),
        bytes = data.len(),
        "preset saved"
    );
    Ok(())
}
