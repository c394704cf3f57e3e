//! Main window: the plugin's controls above a Save / Save As bar.

use std::time::Duration;

use egui::{Align2, CentralPanel, Color32, Context, RichText, TopBottomPanel};
use takehost_core::{ParamDescriptor, ParamUnit};
use takehost_engine::PluginSession;

use crate::editor::{EditorSession, EditorState};
use crate::picker::NativeSavePicker;

/// eframe application hosting one [`EditorSession`].
pub struct EditorApp {
    editor: EditorSession,
    picker: NativeSavePicker,
}

impl EditorApp {
    /// Create the app for an already launched editor session.
    pub fn new(cc: &eframe::CreationContext<'_>, editor: EditorSession) -> Self {
        Self {
            editor,
            picker: NativeSavePicker::new().with_repaint(cc.egui_ctx.clone()),
        }
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        let ready = self.editor.state() == EditorState::Ready;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(ready, egui::Button::new("Save Preset"))
                .clicked()
            {
                self.editor.save(&self.picker);
            }
            if ui
                .add_enabled(ready, egui::Button::new("Save As..."))
                .clicked()
            {
                self.editor.save_as(&self.picker);
            }

            ui.separator();
            let status = match (self.editor.state(), self.editor.preset_path()) {
                (EditorState::SavingAs, _) => "Choosing destination...".to_string(),
                (_, Some(path)) => path.display().to_string(),
                (_, None) => "No preset file".to_string(),
            };
            ui.label(
                RichText::new(status)
                    .small()
                    .color(Color32::from_rgb(150, 150, 160)),
            );
        });
    }

    fn render_status(ui: &mut egui::Ui, session: &PluginSession) {
        ui.horizontal(|ui| {
            ui.label(session.description().format_name.as_str());
            ui.separator();
            ui.label(format!("{:.0} Hz", session.sample_rate()));
            ui.separator();
            ui.label(format!("{} samples", session.block_size()));
            ui.separator();
            ui.label(format!("{}", session.buses_layout()));
            if session.latency_samples() > 0 {
                ui.separator();
                ui.label(format!("latency {} samples", session.latency_samples()));
            }
        });
    }

    /// Generic editor surface: one slider per parameter.
    fn render_params(ui: &mut egui::Ui, session: &mut PluginSession) {
        let params: Vec<ParamDescriptor> = session.params().to_vec();
        ui.heading(session.name());
        ui.add_space(8.0);

        egui::Grid::new("params")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                for (index, descriptor) in params.iter().enumerate() {
                    let mut value = session.param(index).unwrap_or(descriptor.default);
                    ui.label(descriptor.name);
                    let slider = egui::Slider::new(&mut value, descriptor.min..=descriptor.max)
                        .logarithmic(descriptor.unit == ParamUnit::Hertz)
                        .custom_formatter(|v, _| descriptor.format_value(v as f32));
                    let response = ui.add(slider);
                    if response.double_clicked() {
                        value = descriptor.default;
                    }
                    if response.changed() || response.double_clicked() {
                        session.set_param(index, value);
                    }
                    ui.end_row();
                }
            });
    }

    fn render_warning(&mut self, ctx: &Context) {
        let Some(message) = self.editor.warnings().first().cloned() else {
            return;
        };
        egui::Window::new("Warning")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.editor.dismiss_warning();
                }
            });
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.editor.poll();
        if self.editor.state() == EditorState::SavingAs {
            // The picker wakes us when it answers; this is a fallback.
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        TopBottomPanel::bottom("actions").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_actions(ui);
            ui.add_space(4.0);
        });

        if let Some(session) = self.editor.session() {
            TopBottomPanel::top("status").show(ctx, |ui| {
                ui.add_space(2.0);
                Self::render_status(ui, session);
                ui.add_space(2.0);
            });
        }

        CentralPanel::default().show(ctx, |ui| match self.editor.session_mut() {
            Some(session) if session.has_editor() => Self::render_params(ui, session),
            Some(_) => {
                ui.centered_and_justified(|ui| {
                    ui.label("Plugin has no editor");
                });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("Plugin closed");
                });
            }
        });

        self.render_warning(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.editor.close();
    }
}
