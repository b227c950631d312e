#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use anyhow::{Context, Result};
use eframe::egui;
use log::info;

use image_clipper::app::ClipperApp;
use image_clipper::{CropConfig, ImageStore, Session};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(folder) = rfd::FileDialog::new()
        .set_title("Select Image Folder")
        .pick_folder()
    else {
        info!("No folder selected. Exiting.");
        return Ok(());
    };

    let config = CropConfig::default();
    let store = ImageStore::open(&folder)?;
    info!(
        "Found {} images in {}; crops are {}x{} {}",
        store.len(),
        folder.display(),
        config.crop_width,
        config.crop_height,
        config.output_format
    );

    let output_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let session = Session::start(store, config, output_dir)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Image Clipper")
            .with_inner_size([1280.0, 800.0])
            .with_maximized(true),
        ..Default::default()
    };
    eframe::run_native(
        "Image Clipper",
        options,
        Box::new(|cc| Ok(Box::new(ClipperApp::new(cc, session)))),
    )
    .map_err(|e| anyhow::anyhow!("Window error: {}", e))
}
