//! Chain configuration for takehost.
//!
//! - **Chain files**: [`ChainSpec::load`] parses and validates a JSON chain
//!   description into an ordered list of [`Slot`]s with absolute paths
//! - **Chain library**: [`ChainLibrary`] stores named chains in the user's
//!   config directory and exports them as chain files
//! - **Paths**: platform config directory via [`paths`]
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use takehost_config::ChainSpec;
//!
//! let json = r#"{"version":1,"plugins":[
//!     {"path":"fx/gate.thfx"},
//!     {"path":"'fx/eq.thfx'","bypass":true}
//! ]}"#;
//! let spec = ChainSpec::from_json(json, Path::new("/takes")).unwrap();
//! assert_eq!(spec.len(), 2);
//! assert_eq!(spec.active_slots().count(), 1);
//! ```

mod chain;
mod error;
mod library;

/// Platform-specific configuration paths.
pub mod paths;

pub use chain::{CHAIN_VERSION, ChainDocument, ChainEntry, ChainSpec, Slot, resolve_path};
pub use error::ConfigError;
pub use library::ChainLibrary;
pub use paths::{CONFIG_DIR_ENV, chain_library_path, ensure_user_config_dir, user_config_dir};
