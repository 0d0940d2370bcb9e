use std::sync::Arc;

use egui::{Color32, RichText};
use guide_core::{overlay, ViewSnapshot};
use shared::{domain::SpringRecord, error::CameraError};

use crate::backend_bridge::commands::BackendCommand;

const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
const NOTICE_BG: Color32 = Color32::from_rgb(69, 26, 26);

pub fn show_catalog(ui: &mut egui::Ui, records: &[Arc<SpringRecord>]) -> Option<BackendCommand> {
    let mut command = None;

    ui.heading("济南名泉 · AR Guide");
    ui.label(
        RichText::new("Pick a spring to read about it, then explore it through the camera.")
            .weak(),
    );
    ui.add_space(12.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        for record in records {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&record.name).strong().size(18.0));
                        ui.label(RichText::new(&record.location).weak());
                        ui.add_space(4.0);
                        ui.label(&record.description);
                        ui.label(
                            RichText::new(format!(
                                "{} · {} · {} hotspots",
                                record.temperature,
                                record.depth,
                                record.hotspots.len()
                            ))
                            .small()
                            .color(ACCENT),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Explore ▶").clicked() {
                            command = Some(BackendCommand::SelectRecord {
                                id: record.id.clone(),
                            });
                        }
                    });
                });
            });
            ui.add_space(8.0);
        }
    });

    command
}

pub fn notice_text(err: &CameraError) -> String {
    match err {
        CameraError::PermissionDenied(_) => {
            "Camera access was denied. Allow camera access for this app and retry.".to_string()
        }
        CameraError::StreamAcquisitionFailed(reason) => {
            format!("The camera could not be started ({reason}). Check that no other app is using it and retry.")
        }
        CameraError::Cancelled => "The camera request was cancelled.".to_string(),
    }
}

pub fn show_detail(
    ui: &mut egui::Ui,
    record: &SpringRecord,
    snapshot: &ViewSnapshot,
) -> Option<BackendCommand> {
    let mut command = None;

    ui.horizontal(|ui| {
        if ui.button("⬅ Catalog").clicked() {
            command = Some(BackendCommand::BackToCatalog);
        }
        ui.heading(&record.name);
        ui.label(RichText::new(&record.location).weak());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if snapshot.activation_pending {
                if ui.button("Cancel").clicked() {
                    command = Some(BackendCommand::ExitAr);
                }
                ui.label("Requesting camera...");
                ui.spinner();
            } else if ui
                .add(egui::Button::new(RichText::new("📷 Start AR").strong()).fill(ACCENT))
                .clicked()
            {
                command = Some(BackendCommand::StartAr);
            }
        });
    });
    ui.separator();

    if let Some(err) = &snapshot.camera_notice {
        egui::Frame::new()
            .fill(NOTICE_BG)
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::same(10))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(RichText::new(notice_text(err)).color(Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Retry permission").clicked() {
                            command = Some(BackendCommand::RetryPermission);
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    let panel = overlay::record_panel(record);
    let active = snapshot.overlay.active_hotspot_id();

    ui.columns(2, |cols| {
        egui::ScrollArea::vertical()
            .id_salt("detail_text")
            .show(&mut cols[0], |ui| {
                ui.label(&record.description);
                ui.add_space(8.0);
                egui::Grid::new("detail_metrics")
                    .num_columns(2)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Temperature").weak());
                        ui.label(&panel.temperature);
                        ui.end_row();
                        ui.label(RichText::new("Depth").weak());
                        ui.label(&panel.depth);
                        ui.end_row();
                        ui.label(RichText::new("Flow").weak());
                        ui.label(&panel.flow);
                        ui.end_row();
                        ui.label(RichText::new("Map position").weak());
                        ui.label(format!(
                            "{:.0}%, {:.0}%",
                            record.coordinates.x, record.coordinates.y
                        ));
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.label(RichText::new("Features").strong());
                for feature in &panel.features {
                    ui.label(format!("• {feature}"));
                }
                ui.add_space(8.0);
                ui.label(RichText::new("Legend").strong());
                ui.label(RichText::new(&panel.legend).italics());
                ui.add_space(8.0);
                ui.label(RichText::new("History").strong());
                ui.label(&record.history);
                ui.add_space(8.0);
                ui.label(
                    RichText::new(format!(
                        "assets: {} · {} · {}",
                        record.image, record.ar_model, record.audio_guide
                    ))
                    .small()
                    .weak(),
                );
            });

        let ui = &mut cols[1];
        ui.label(RichText::new("Hotspots").strong());
        for hotspot in &record.hotspots {
            let selected = active == Some(&hotspot.id);
            if ui.selectable_label(selected, &hotspot.name).clicked() {
                command = Some(BackendCommand::SelectHotspot {
                    id: hotspot.id.clone(),
                });
            }
        }
        if let Some(panel) = overlay::hotspot_panel(record, active) {
            ui.add_space(8.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.label(RichText::new(&panel.name).strong().color(ACCENT));
                ui.label(&panel.info);
            });
        }

        ui.add_space(12.0);
        ui.label(RichText::new("How to explore").strong());
        for (step, text) in [
            "Press Start AR and allow camera access.",
            "Point the camera at the spring.",
            "Tap a marker to read about that spot.",
            "Use Reset view to clear the selection.",
        ]
        .iter()
        .enumerate()
        {
            ui.label(format!("{}. {text}", step + 1));
        }
    });

    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_and_failure_read_differently() {
        let denied = notice_text(&CameraError::PermissionDenied("NotAllowedError".into()));
        let failed = notice_text(&CameraError::StreamAcquisitionFailed(
            "Could not start video source".into(),
        ));

        assert!(denied.contains("denied"));
        assert!(failed.contains("Could not start video source"));
        assert_ne!(denied, failed);
    }
}
