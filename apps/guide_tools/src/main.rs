use std::{io::Write, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use catalog::Catalog;
use clap::{Parser, Subcommand};
use guide_core::{
    build_controller, config::load_settings, CameraEvent, MarkerVisual, ViewController, ViewMode,
};
use media_capture::{CameraPolicy, CaptureConstraints, MediaCaptureDevice, SimulatedCamera};
use shared::domain::{HotspotId, SpringId, SpringRecord};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Settings file to use instead of the default search path.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON catalog replacing the built-in spring records.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the springs in the catalog.
    List,
    /// Print every field of one spring, hotspots included.
    Show { id: String },
    /// Drive the catalog -> detail -> AR flow against the simulated camera.
    Walkthrough {
        id: String,
        #[arg(long)]
        camera: Option<CameraPolicy>,
        /// Hotspots to tap once AR is active, in order.
        #[arg(long = "select")]
        select: Vec<String>,
        /// After a refusal, grant access and retry once.
        #[arg(long)]
        retry: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(path) = &cli.catalog {
        settings.catalog_path = Some(path.clone());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let catalog = Arc::new(match &settings.catalog_path {
        Some(path) => Catalog::load_json(path)?,
        None => Catalog::builtin(),
    });
    tracing::debug!(records = catalog.len(), "guide_tools: catalog ready");
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::List => {
            for record in catalog.records() {
                writeln!(out, "{}", record_line(record))?;
            }
        }
        Command::Show { id } => {
            let record = catalog
                .get(&SpringId::new(id.as_str()))
                .with_context(|| format!("no spring with id '{id}'"))?;
            write_record(&mut out, &record)?;
        }
        Command::Walkthrough {
            id,
            camera,
            select,
            retry,
        } => {
            let policy = camera.unwrap_or(settings.camera_policy);
            let device = Arc::new(SimulatedCamera::with_latency(
                policy,
                settings.camera_latency(),
            ));
            let mut controller = build_controller(
                catalog,
                Arc::clone(&device) as Arc<dyn MediaCaptureDevice>,
                CaptureConstraints::video(settings.camera_facing),
            );
            let plan = Walkthrough {
                record: SpringId::new(id),
                select: select.into_iter().map(HotspotId::new).collect(),
                retry,
            };
            plan.run(&mut controller, &device, &mut out).await?;
        }
    }

    Ok(())
}

fn record_line(record: &SpringRecord) -> String {
    format!(
        "{:<10} {} · {} · {} / {} · {} hotspots",
        record.id.as_str(),
        record.name,
        record.location,
        record.temperature,
        record.depth,
        record.hotspots.len()
    )
}

fn write_record(out: &mut dyn Write, record: &SpringRecord) -> Result<()> {
    writeln!(out, "{} ({})", record.name, record.id)?;
    writeln!(out, "location:    {}", record.location)?;
    writeln!(out, "temperature: {}", record.temperature)?;
    writeln!(out, "depth:       {}", record.depth)?;
    writeln!(out, "flow:        {}", record.flow)?;
    writeln!(
        out,
        "anchor:      ({}, {})",
        record.coordinates.x, record.coordinates.y
    )?;
    writeln!(out, "\n{}", record.description)?;
    writeln!(out, "\nhistory: {}", record.history)?;
    writeln!(out, "legend:  {}", record.legend)?;
    writeln!(out, "\nfeatures:")?;
    for feature in &record.features {
        writeln!(out, "  - {feature}")?;
    }
    writeln!(out, "\nhotspots:")?;
    for hotspot in &record.hotspots {
        writeln!(
            out,
            "  {:<18} ({:>3}, {:>3})  {}: {}",
            hotspot.id.as_str(),
            hotspot.position.x,
            hotspot.position.y,
            hotspot.name,
            hotspot.info
        )?;
    }
    writeln!(
        out,
        "\nassets: image={} model={} audio={}",
        record.image, record.ar_model, record.audio_guide
    )?;
    Ok(())
}

fn marker_line(marker: &MarkerVisual) -> String {
    format!(
        "  {} {:<18} at ({}, {}) x{:.2}",
        if marker.is_active() { "*" } else { "o" },
        marker.hotspot_id.as_str(),
        marker.position.x,
        marker.position.y,
        marker.scale
    )
}

struct Walkthrough {
    record: SpringId,
    select: Vec<HotspotId>,
    retry: bool,
}

impl Walkthrough {
    async fn run(
        &self,
        controller: &mut ViewController,
        device: &SimulatedCamera,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut events = controller.camera().subscribe_events();

        controller.select_record(&self.record)?;
        writeln!(out, "catalog -> detail: {}", self.record)?;

        let mut entered = self.start_ar(controller, &mut events, out).await?;
        if !entered && self.retry && controller.camera_notice().is_some() {
            device.set_policy(CameraPolicy::Grant);
            writeln!(out, "retrying camera permission")?;
            if let Err(err) = controller.retry_permission().await {
                writeln!(out, "retry failed: {err}")?;
            }
            drain_events(&mut events, out)?;
            entered = self.start_ar(controller, &mut events, out).await?;
        }

        if entered {
            self.explore(controller, out)?;
            controller.exit_ar()?;
            drain_events(&mut events, out)?;
            writeln!(
                out,
                "ar -> detail: live tracks {}",
                controller.camera().live_track_count()
            )?;
        }

        controller.back_to_catalog()?;
        writeln!(out, "detail -> catalog")?;
        writeln!(
            out,
            "camera requests: {}, streams issued: {}, live tracks: {}",
            device.request_count(),
            device.streams_issued(),
            device.live_tracks()
        )?;
        Ok(())
    }

    async fn start_ar(
        &self,
        controller: &mut ViewController,
        events: &mut broadcast::Receiver<CameraEvent>,
        out: &mut dyn Write,
    ) -> Result<bool> {
        writeln!(out, "start AR")?;
        let result = controller.start_ar().await;
        drain_events(events, out)?;
        match result {
            Ok(()) => {
                let ViewMode::ArActive(record) = controller.mode() else {
                    return Ok(false);
                };
                writeln!(out, "detail -> ar: {}", record.name)?;
                Ok(true)
            }
            Err(err) => {
                writeln!(out, "AR unavailable: {err}")?;
                if controller.camera_notice().is_some() {
                    writeln!(out, "notice: camera access denied, retry is available")?;
                }
                Ok(false)
            }
        }
    }

    fn explore(&self, controller: &mut ViewController, out: &mut dyn Write) -> Result<()> {
        for id in &self.select {
            let before = controller.overlay().active_hotspot_id().cloned();
            let after = controller.select_hotspot(id).active_hotspot_id().cloned();
            match (&before, &after) {
                (_, Some(active)) if active == id => {
                    writeln!(out, "tap {id}: active")?;
                }
                (Some(prev), None) if prev == id => {
                    writeln!(out, "tap {id}: cleared")?;
                }
                _ => writeln!(out, "tap {id}: ignored")?,
            }
        }

        let view = controller.snapshot().ar_view;
        if let Some(view) = view {
            writeln!(out, "markers:")?;
            for marker in &view.markers {
                writeln!(out, "{}", marker_line(marker))?;
            }
            if let Some(panel) = &view.hotspot_panel {
                writeln!(out, "panel: {} - {}", panel.name, panel.info)?;
            }
        }
        Ok(())
    }
}

fn drain_events(
    events: &mut broadcast::Receiver<CameraEvent>,
    out: &mut dyn Write,
) -> Result<()> {
    while let Ok(CameraEvent::PermissionChanged(state)) = events.try_recv() {
        writeln!(out, "  camera: {}", state.label())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    async fn transcript(policy: CameraPolicy, plan: Walkthrough) -> (String, Arc<SimulatedCamera>) {
        let device = Arc::new(SimulatedCamera::with_latency(policy, Duration::ZERO));
        let mut controller = build_controller(
            Arc::new(Catalog::builtin()),
            Arc::clone(&device) as Arc<dyn MediaCaptureDevice>,
            CaptureConstraints::default(),
        );
        let mut out = Vec::new();
        plan.run(&mut controller, &device, &mut out)
            .await
            .expect("walkthrough");
        (String::from_utf8(out).expect("utf8"), device)
    }

    #[tokio::test]
    async fn granted_walkthrough_taps_and_releases() {
        let plan = Walkthrough {
            record: SpringId::new("baotu"),
            select: vec![
                HotspotId::new("main-spring"),
                HotspotId::new("pearl-bubbles"),
            ],
            retry: false,
        };
        let (text, device) = transcript(CameraPolicy::Grant, plan).await;

        assert!(text.contains("detail -> ar: 趵突泉"));
        assert!(text.contains("tap main-spring: active"));
        assert!(text.contains("tap pearl-bubbles: ignored"));
        assert!(text.contains("* main-spring"));
        assert!(text.contains("panel: 主泉眼"));
        assert!(text.contains("ar -> detail: live tracks 0"));
        assert_eq!(device.live_tracks(), 0);
    }

    #[tokio::test]
    async fn denied_walkthrough_can_retry() {
        let plan = Walkthrough {
            record: SpringId::new("heihu"),
            select: vec![],
            retry: true,
        };
        let (text, device) = transcript(CameraPolicy::Deny, plan).await;

        assert!(text.contains("AR unavailable"));
        assert!(text.contains("notice: camera access denied"));
        assert!(text.contains("retrying camera permission"));
        assert!(text.contains("detail -> ar: 黑虎泉"));
        assert_eq!(device.request_count(), 2);
        assert_eq!(device.live_tracks(), 0);
    }

    #[tokio::test]
    async fn denied_walkthrough_without_retry_stays_in_detail() {
        let plan = Walkthrough {
            record: SpringId::new("zhenzhu"),
            select: vec![HotspotId::new("wishing-well")],
            retry: false,
        };
        let (text, device) = transcript(CameraPolicy::Deny, plan).await;

        assert!(!text.contains("detail -> ar"));
        assert!(!text.contains("tap "));
        assert_eq!(device.request_count(), 1);
    }

    #[test]
    fn show_prints_hotspot_positions() {
        let record = Catalog::builtin()
            .get(&SpringId::new("baotu"))
            .expect("baotu");
        let mut out = Vec::new();
        write_record(&mut out, &record).expect("write");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("main-spring"));
        assert!(text.contains("( 45,  55)"));
        assert!(record_line(&record).starts_with("baotu"));
    }
}
