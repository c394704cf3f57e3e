//! takehost GUI - edit one plugin's settings and save them as a preset.
//!
//! The editing logic lives in [`EditorSession`], which knows nothing about
//! egui: it owns the plugin session, the associated preset path and the
//! Save / Save As state machine. [`EditorApp`] draws it with eframe.
//!
//! Save As never blocks the UI thread. The file prompt is issued through a
//! [`SaveFilePicker`] and its answer arrives later on a [`SaveRequest`],
//! which the session polls once per frame.

pub mod app;
pub mod editor;
pub mod launch;
pub mod picker;

pub use app::EditorApp;
pub use editor::{EditorSession, EditorState};
pub use launch::{LaunchArgs, LaunchError, launch};
pub use picker::{NativeSavePicker, PickerStatus, SaveFilePicker, SaveRequest};
