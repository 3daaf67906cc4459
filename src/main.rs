mod app;
mod config;
mod upload;
mod utils;

use anyhow::Context;
use app::FormUploader;
use clap::Parser;
use config::Settings;
use eframe::CreationContext;
use upload::{RuntimeDispatcher, UploadClient};

fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let client = UploadClient::new(settings.api_base_url.clone());
    tracing::info!(url = %client.upload_url(), "upload endpoint configured");
    let dispatcher =
        RuntimeDispatcher::new(client).context("failed to build upload runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 700.0])
            .with_min_inner_size([420.0, 520.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "File Upload",
        options,
        Box::new(move |cc: &CreationContext| {
            Box::new(FormUploader::new(cc, &settings, Box::new(dispatcher)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the window: {e}"))
}
