//! Editor session state machine.

use std::path::{Path, PathBuf};

use takehost_engine::{PluginSession, save_preset};

use crate::picker::{PickerStatus, SaveFilePicker, SaveRequest};

/// Where the editor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Plugin loaded; Save and Save As are available.
    Ready,
    /// A save prompt is open and its answer has not arrived.
    SavingAs,
    /// The plugin has been released.
    Closed,
}

/// One plugin being edited, plus the preset file it saves to.
#[derive(Debug)]
pub struct EditorSession {
    session: Option<PluginSession>,
    preset_path: Option<PathBuf>,
    state: EditorState,
    pending: Option<SaveRequest>,
    warnings: Vec<String>,
    last_saved: Option<PathBuf>,
}

impl EditorSession {
    /// Wrap a prepared session. `preset_path` is where Save writes.
    pub fn new(session: PluginSession, preset_path: Option<PathBuf>) -> Self {
        Self {
            session: Some(session),
            preset_path,
            state: EditorState::Ready,
            pending: None,
            warnings: Vec::new(),
            last_saved: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Preset file Save writes to, once one is known.
    pub fn preset_path(&self) -> Option<&Path> {
        self.preset_path.as_deref()
    }

    /// Destination of the last successful save.
    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }

    /// The plugin, until the editor is closed.
    pub fn session(&self) -> Option<&PluginSession> {
        self.session.as_ref()
    }

    /// Mutable access to the plugin, until the editor is closed.
    pub fn session_mut(&mut self) -> Option<&mut PluginSession> {
        self.session.as_mut()
    }

    /// Save to the associated preset path, or prompt for one if there is
    /// none yet.
    pub fn save(&mut self, picker: &dyn SaveFilePicker) {
        if self.state != EditorState::Ready {
            return;
        }
        match self.preset_path.clone() {
            Some(path) => self.write_preset(&path),
            None => self.save_as(picker),
        }
    }

    /// Prompt for a destination. The answer is picked up by [`poll`](Self::poll).
    pub fn save_as(&mut self, picker: &dyn SaveFilePicker) {
        if self.state != EditorState::Ready {
            return;
        }
        self.pending = Some(picker.request(self.preset_path.as_deref()));
        self.state = EditorState::SavingAs;
    }

    /// Collect the answer of an open save prompt, if it has arrived.
    ///
    /// A chosen path becomes the associated preset path and is saved to
    /// immediately; a cancelled prompt changes nothing.
    pub fn poll(&mut self) {
        if self.state != EditorState::SavingAs {
            return;
        }
        let status = self
            .pending
            .as_ref()
            .map_or(PickerStatus::Cancelled, SaveRequest::poll);
        match status {
            PickerStatus::Pending => {}
            PickerStatus::Cancelled => {
                tracing::debug!("save as cancelled");
                self.pending = None;
                self.state = EditorState::Ready;
            }
            PickerStatus::Chosen(path) => {
                self.pending = None;
                self.state = EditorState::Ready;
                self.preset_path = Some(path.clone());
                self.write_preset(&path);
            }
        }
    }

    fn write_preset(&mut self, path: &Path) {
        let Some(session) = &self.session else {
            return;
        };
        match save_preset(session, path) {
            Ok(()) => {
                tracing::info!(preset = %path.display(), plugin = session.name(), "preset saved");
                self.last_saved = Some(path.to_path_buf());
            }
            Err(e) => {
                tracing::warn!(preset = %path.display(), error = %e, "failed to save preset");
                self.warnings.push(format!("Failed to save preset.\n\n{e}"));
            }
        }
    }

    /// Warnings not yet dismissed, oldest first.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Add a warning for the user.
    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Dismiss the oldest warning.
    pub fn dismiss_warning(&mut self) {
        if !self.warnings.is_empty() {
            self.warnings.remove(0);
        }
    }

    /// Release the plugin. Further actions are ignored.
    pub fn close(&mut self) {
        if self.state == EditorState::Closed {
            return;
        }
        self.state = EditorState::Closed;
        self.pending = None;
        if let Some(session) = self.session.take() {
            tracing::info!(plugin = session.name(), "closing editor");
            session.close();
        }
    }
}
