//! Asynchronous save-file prompt.
//!
//! A [`SaveRequest`] is a single-shot answer slot: the picker sends at most
//! one value (`Some(path)` on confirmation, `None` on cancellation) and the
//! UI thread polls it without blocking.

use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// State of a pending save prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerStatus {
    /// The user has not answered yet.
    Pending,
    /// The user chose a destination.
    Chosen(PathBuf),
    /// The prompt was dismissed or its producer went away.
    Cancelled,
}

/// Receiving end of one save prompt.
#[derive(Debug)]
pub struct SaveRequest {
    rx: Receiver<Option<PathBuf>>,
}

impl SaveRequest {
    /// A new request and the sender that answers it.
    pub fn channel() -> (Sender<Option<PathBuf>>, Self) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (tx, Self { rx })
    }

    /// Check for an answer without blocking.
    pub fn poll(&self) -> PickerStatus {
        match self.rx.try_recv() {
            Ok(Some(path)) => PickerStatus::Chosen(path),
            Ok(None) | Err(TryRecvError::Disconnected) => PickerStatus::Cancelled,
            Err(TryRecvError::Empty) => PickerStatus::Pending,
        }
    }
}

/// Something that can ask the user where to save a preset.
pub trait SaveFilePicker {
    /// Start a prompt, suggesting `current` as the initial destination.
    fn request(&self, current: Option<&Path>) -> SaveRequest;
}

/// File extensions offered in the save prompt.
const PRESET_EXTENSIONS: &[&str] = &["vstpreset", "fxp", "fxb", "bin"];

/// Native save dialog via `rfd`.
///
/// The dialog runs on a helper thread and wakes the UI when it returns.
/// macOS only allows dialogs on the main thread, so there the prompt runs
/// inline and the answer is ready on the first poll.
#[derive(Default)]
pub struct NativeSavePicker {
    repaint: Option<egui::Context>,
}

impl NativeSavePicker {
    /// Picker that does not wake any UI.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a repaint of `ctx` once the user answers.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    fn dialog(current: Option<&Path>) -> rfd::FileDialog {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save preset")
            .add_filter("Presets", PRESET_EXTENSIONS);
        if let Some(current) = current {
            if let Some(dir) = current.parent().filter(|d| d.is_dir()) {
                dialog = dialog.set_directory(dir);
            }
            if let Some(name) = current.file_name() {
                dialog = dialog.set_file_name(name.to_string_lossy());
            }
        }
        dialog
    }
}

impl SaveFilePicker for NativeSavePicker {
    fn request(&self, current: Option<&Path>) -> SaveRequest {
        let (tx, request) = SaveRequest::channel();
        let current = current.map(Path::to_path_buf);
        let repaint = self.repaint.clone();

        let prompt = move || {
            let _ = tx.send(Self::dialog(current.as_deref()).save_file());
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        };

        if cfg!(target_os = "macos") {
            prompt();
        } else if let Err(e) = std::thread::Builder::new()
            .name("save-dialog".into())
            .spawn(prompt)
        {
            // The sender died with the closure, so the request reads as cancelled.
            tracing::warn!(error = %e, "could not open save dialog");
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_pending_until_answered() {
        let (tx, request) = SaveRequest::channel();
        assert_eq!(request.poll(), PickerStatus::Pending);
        tx.send(Some(PathBuf::from("/p/a.bin"))).unwrap();
        assert_eq!(request.poll(), PickerStatus::Chosen(PathBuf::from("/p/a.bin")));
    }

    #[test]
    fn explicit_cancel() {
        let (tx, request) = SaveRequest::channel();
        tx.send(None).unwrap();
        assert_eq!(request.poll(), PickerStatus::Cancelled);
    }

    #[test]
    fn dropped_sender_counts_as_cancel() {
        let (tx, request) = SaveRequest::channel();
        drop(tx);
        assert_eq!(request.poll(), PickerStatus::Cancelled);
    }
}
