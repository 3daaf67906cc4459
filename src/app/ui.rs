use super::FormUploader;
use crate::upload::{Field, Notification, Severity};
use crate::utils::file_size::format_size;
use egui::{Align, Align2, Color32, RichText, Stroke};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(11, 9, 106);

enum FileAction {
    Preview(usize),
    Remove(usize),
}

impl FormUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let footer_height = 48.0;
            let content_height = ui.available_height() - footer_height;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading(RichText::new("File Upload").color(ACCENT).strong());
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Fill out the fields below and select files to upload.")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_fields(ui);
                    ui.add_space(20.0);
                    self.render_drop_zone(ui);
                    ui.add_space(10.0);
                    self.render_file_list(ui);
                    ui.add_space(10.0);
                    self.render_actions(ui);
                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(10.0);
                self.render_notification(ui);
            });
        });

        if self.controller.is_uploading() {
            self.render_progress(ctx);
        }
    }

    fn render_fields(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.controller.is_uploading();
        let mut user_name = self.controller.fields().user_name.clone();
        let mut description = self.controller.fields().description.clone();

        ui.group(|ui| {
            ui.label("Name *");
            let name_edit = egui::TextEdit::singleline(&mut user_name)
                .desired_width(ui.available_width())
                .hint_text("Enter your name");
            if ui.add_enabled(enabled, name_edit).changed() {
                self.controller.edit_field(Field::UserName, user_name);
            }

            ui.add_space(8.0);
            ui.label("Description *");
            let description_edit = egui::TextEdit::multiline(&mut description)
                .desired_width(ui.available_width())
                .desired_rows(3)
                .hint_text("Enter a brief description of what you will be uploading");
            if ui.add_enabled(enabled, description_edit).changed() {
                self.controller.edit_field(Field::Description, description);
            }
        });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let stroke = if hovering {
            Stroke::new(2.0, ACCENT)
        } else {
            Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
        };

        let response = egui::Frame::none()
            .stroke(stroke)
            .rounding(6.0)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label("📁 Drag 'n' drop some files here, or click to select files");
                });
            })
            .response
            .interact(egui::Sense::click());

        if response.clicked() && !self.controller.is_uploading() {
            if let Some(paths) = FileDialog::new().pick_files() {
                self.add_paths(paths);
            }
        }
    }

    fn render_file_list(&mut self, ui: &mut egui::Ui) {
        if self.controller.files().is_empty() {
            return;
        }

        let locked = self.controller.is_uploading();
        let mut action = None;
        egui::ScrollArea::vertical()
            .id_source("selected_files")
            .max_height(200.0)
            .show(ui, |ui| {
                for (index, file) in self.controller.files().iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(file.name());
                        ui.label(
                            RichText::new(format_size(file.handle.size))
                                .color(Color32::from_rgb(150, 150, 150)),
                        );
                        ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                            let remove = egui::Button::new("🗑").small();
                            if ui.add_enabled(!locked, remove).on_hover_text("Remove").clicked() {
                                action = Some(FileAction::Remove(index));
                            }
                            let preview = egui::Button::new("👁").small();
                            if ui.add_enabled(!locked, preview).on_hover_text("Preview").clicked() {
                                action = Some(FileAction::Preview(index));
                            }
                        });
                    });
                }
            });

        match action {
            Some(FileAction::Remove(index)) => self.controller.remove_file_at(index),
            Some(FileAction::Preview(index)) => self.open_preview(index),
            None => {}
        }
    }

    fn open_preview(&self, index: usize) {
        let Some(file) = self.controller.files().get(index) else {
            return;
        };
        if let Some(path) = self.controller.preview_path(file.preview) {
            if let Err(e) = open::that(path) {
                tracing::warn!("could not open preview for {}: {}", path.display(), e);
            }
        }
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        let can_submit = self.controller.can_submit();
        ui.vertical_centered(|ui| {
            ui.horizontal(|ui| {
                ui.add_enabled_ui(can_submit, |ui| {
                    if ui
                        .add(egui::Button::new("Clear").min_size(egui::vec2(100.0, 32.0)))
                        .clicked()
                    {
                        self.controller.clear_files();
                    }
                    if ui
                        .add(egui::Button::new("📤 Upload").min_size(egui::vec2(100.0, 32.0)))
                        .clicked()
                    {
                        self.controller.start_upload();
                    }
                });
            });
        });
    }

    fn render_progress(&mut self, ctx: &egui::Context) {
        let progress = self.controller.progress();
        egui::Window::new("Uploading")
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.add(
                    egui::ProgressBar::new(f32::from(progress) / 100.0)
                        .desired_width(240.0)
                        .text(format!("{progress}%"))
                        .fill(ACCENT),
                );
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.controller.cancel_upload();
                    }
                });
            });
    }

    fn render_notification(&mut self, ui: &mut egui::Ui) {
        let Some(Notification { message, severity }) = self.controller.notification().cloned()
        else {
            return;
        };

        let fill = match severity {
            Severity::Info => Color32::from_rgb(2, 136, 209),
            Severity::Success => Color32::from_rgb(46, 125, 50),
            Severity::Error => Color32::from_rgb(211, 47, 47),
        };

        egui::Frame::none()
            .fill(fill)
            .rounding(4.0)
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(message).color(Color32::WHITE));
                    if ui
                        .add(egui::Button::new(RichText::new("✖").color(Color32::WHITE)).frame(false))
                        .clicked()
                    {
                        self.controller.dismiss_notification();
                    }
                });
            });
    }
}
