use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use catalog::Catalog;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use guide_core::{config::load_settings, GuideSettings};
use media_capture::{CameraPolicy, FacingMode};
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime::BackendConfig};
use crate::controller::events::UiEvent;
use crate::ui::app::GuideApp;

#[derive(Parser, Debug)]
#[command(name = "guide_gui", about = "Desktop AR guide for the Jinan springs")]
struct Args {
    /// Settings file to use instead of the default search path.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON catalog replacing the built-in spring records.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// How the simulated camera answers permission prompts: grant, deny or fail.
    #[arg(long)]
    camera: Option<CameraPolicy>,
    /// Use the front-facing camera.
    #[arg(long)]
    front: bool,
}

impl Args {
    fn apply(&self, settings: &mut GuideSettings) {
        if let Some(path) = &self.catalog {
            settings.catalog_path = Some(path.clone());
        }
        if let Some(policy) = self.camera {
            settings.camera_policy = policy;
        }
        if self.front {
            settings.camera_facing = FacingMode::User;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    args.apply(&mut settings);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let catalog = Arc::new(match &settings.catalog_path {
        Some(path) => Catalog::load_json(path)?,
        None => Catalog::builtin(),
    });
    tracing::info!(
        records = catalog.len(),
        policy = ?settings.camera_policy,
        facing = settings.camera_facing.label(),
        "guide_gui starting"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(
        cmd_rx,
        ui_tx,
        BackendConfig {
            catalog: Arc::clone(&catalog),
            settings,
        },
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Spring AR Guide")
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([860.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Spring AR Guide",
        options,
        Box::new(|cc| Ok(Box::new(GuideApp::new(cc, cmd_tx, ui_rx, catalog)))),
    )
    .map_err(|err| anyhow::anyhow!("guide window failed: {err}"))
}
