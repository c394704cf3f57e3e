//! Platform-specific configuration paths.
//!
//! - **User config**: `~/.config/takehost/` (Linux),
//!   `~/Library/Application Support/takehost/` (macOS),
//!   `%APPDATA%\takehost\` (Windows)
//! - **Chain library**: `<user config>/chains.json`
//!
//! Setting `TAKEHOST_CONFIG_DIR` replaces the user config directory.

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "takehost";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "TAKEHOST_CONFIG_DIR";

/// File name of the chain library.
const LIBRARY_FILE: &str = "chains.json";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the named chain library.
pub fn chain_library_path() -> PathBuf {
    user_config_dir().join(LIBRARY_FILE)
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_lives_in_config_dir() {
        let path = chain_library_path();
        assert_eq!(path.file_name().unwrap(), "chains.json");
        assert_eq!(path.parent().unwrap(), user_config_dir());
    }

    #[test]
    fn default_dir_names_the_app() {
        if std::env::var_os(CONFIG_DIR_ENV).is_none() {
            assert!(user_config_dir().to_string_lossy().contains("takehost"));
        }
    }
}
