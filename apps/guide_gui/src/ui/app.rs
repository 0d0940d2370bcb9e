use std::{sync::Arc, time::Duration};

use catalog::Catalog;
use crossbeam_channel::{Receiver, Sender};
use guide_core::{PermissionState, ViewMode, ViewSnapshot};
use media_capture::StreamInfo;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

use super::{ar_view, fonts, pages};

pub(super) fn ui_in_rect(ui: &mut egui::Ui, rect: egui::Rect, add: impl FnOnce(&mut egui::Ui)) {
    let mut child = ui.new_child(
        egui::UiBuilder::new()
            .max_rect(rect)
            .layout(egui::Layout::top_down(egui::Align::Min)),
    );
    child.set_clip_rect(rect);
    add(&mut child);
}

pub struct GuideApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    catalog: Arc<Catalog>,
    snapshot: Option<ViewSnapshot>,
    permission: PermissionState,
    feed: Option<StreamInfo>,
    status: String,
    status_banner: Option<UiError>,
}

impl GuideApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        catalog: Arc<Catalog>,
    ) -> Self {
        fonts::install_cjk_fallback(&cc.egui_ctx);
        Self {
            cmd_tx,
            ui_rx,
            catalog,
            snapshot: None,
            permission: PermissionState::Unacquired,
            feed: None,
            status: "Starting...".to_string(),
            status_banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Snapshot(snapshot) => {
                    if snapshot.camera_notice.is_none()
                        && self
                            .status_banner
                            .as_ref()
                            .is_some_and(UiError::is_retryable)
                    {
                        self.status_banner = None;
                    }
                    self.snapshot = Some(*snapshot);
                }
                UiEvent::PermissionChanged(state) => {
                    self.status = format!("Camera: {}", state.label());
                    self.permission = state;
                }
                UiEvent::FeedAttached(stream) => {
                    self.feed = Some(stream);
                }
                UiEvent::FeedDetached => {
                    self.feed = None;
                }
                UiEvent::Error(err) => {
                    self.status = err.message().to_string();
                    self.status_banner = Some(err);
                }
            }
        }
    }

    fn send(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (color, label) = match &self.permission {
                    PermissionState::Acquired(_) => (egui::Color32::from_rgb(34, 197, 94), "camera live"),
                    PermissionState::Pending => (egui::Color32::from_rgb(234, 179, 8), "camera pending"),
                    PermissionState::Denied(_) => (egui::Color32::from_rgb(239, 68, 68), "camera denied"),
                    PermissionState::Unacquired => (egui::Color32::GRAY, "camera off"),
                };
                ui.label(egui::RichText::new("●").color(color));
                ui.label(egui::RichText::new(label).small());
                ui.separator();
                ui.label(egui::RichText::new(&self.status).small());
                if let Some(snapshot) = &self.snapshot {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} · {} live track(s)",
                                snapshot.mode.name(),
                                snapshot.live_tracks
                            ))
                            .small()
                            .weak(),
                        );
                    });
                }
            });
        });
    }

    fn show_banner(&mut self, ui: &mut egui::Ui) {
        let Some(err) = &self.status_banner else {
            return;
        };
        let mut dismiss = false;
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{}: {}", err.category().label(), err.message()))
                    .color(egui::Color32::from_rgb(248, 113, 113)),
            );
            if ui.small_button("✕").clicked() {
                dismiss = true;
            }
        });
        ui.add_space(4.0);
        if dismiss {
            self.status_banner = None;
        }
    }
}

impl eframe::App for GuideApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_status_bar(ctx);

        let elapsed = ctx.input(|input| input.time);
        let mut command = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_banner(ui);
            let Some(snapshot) = &self.snapshot else {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                return;
            };
            command = match &snapshot.mode {
                ViewMode::Catalog => pages::show_catalog(ui, self.catalog.records()),
                ViewMode::Detail(record) => pages::show_detail(ui, record, snapshot),
                ViewMode::ArActive(_) => match &snapshot.ar_view {
                    Some(view) => ar_view::show(ui, view, self.feed.as_ref(), elapsed),
                    None => None,
                },
            };
        });
        if let Some(cmd) = command {
            self.send(cmd);
        }

        let in_ar = self
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| matches!(snapshot.mode, ViewMode::ArActive(_)));
        if in_ar {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
