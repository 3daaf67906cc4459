mod controller;
mod ui;

use crate::config::Settings;
use crate::upload::{collect_files, UploadDispatcher};
use eframe::App;
use std::path::PathBuf;
use std::time::Duration;

use controller::UploadController;

const TICK: Duration = Duration::from_millis(100);

pub struct FormUploader {
    controller: UploadController,
    notification_timeout: Duration,
}

impl FormUploader {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: &Settings,
        dispatcher: Box<dyn UploadDispatcher>,
    ) -> Self {
        tracing::info!(base_url = %settings.api_base_url, "initializing form uploader");
        Self {
            controller: UploadController::new(dispatcher),
            notification_timeout: settings.notification_timeout(),
        }
    }

    pub fn add_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        let files = collect_files(&paths);
        tracing::debug!(dropped = paths.len(), accepted = files.len(), "files selected");
        self.controller.add_files(files);
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        self.add_paths(dropped);

        if self.controller.poll_events() {
            ctx.request_repaint();
        }
        if self.controller.dismiss_expired(self.notification_timeout) {
            ctx.request_repaint();
        }

        if self.controller.is_uploading() || self.controller.notification().is_some() {
            ctx.request_repaint_after(TICK);
        }
    }
}

impl App for FormUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
