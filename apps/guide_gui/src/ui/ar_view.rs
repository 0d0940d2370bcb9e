//! AR screen: simulated camera feed with hotspot markers painted on top.

use std::f32::consts::TAU;

use egui::{Align2, Color32, CornerRadius, FontId, Pos2, Rect, RichText, Sense, Stroke};
use guide_core::{ArViewModel, MarkerTone, MarkerVisual};
use media_capture::StreamInfo;
use shared::domain::Position;

use crate::backend_bridge::commands::BackendCommand;

use super::app::ui_in_rect;

const MARKER_RADIUS: f32 = 14.0;
const IDLE_MARKER: Color32 = Color32::from_rgb(59, 130, 246);
const ACTIVE_MARKER: Color32 = Color32::from_rgb(250, 204, 21);
const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(12, 18, 28, 220);
const PANEL_TEXT: Color32 = Color32::from_rgb(226, 232, 240);
const LIVE_RED: Color32 = Color32::from_rgb(239, 68, 68);

/// Screen position of a marker placed at percentage coordinates inside `rect`.
pub fn marker_center(rect: Rect, position: Position) -> Pos2 {
    let (fx, fy) = position.to_fraction();
    rect.min + egui::vec2(rect.width() * fx, rect.height() * fy)
}

pub fn marker_radius(marker: &MarkerVisual) -> f32 {
    MARKER_RADIUS * marker.scale
}

fn marker_fill(tone: MarkerTone) -> Color32 {
    match tone {
        MarkerTone::Idle => IDLE_MARKER,
        MarkerTone::Highlighted => ACTIVE_MARKER,
    }
}

pub fn show(
    ui: &mut egui::Ui,
    view: &ArViewModel,
    feed: Option<&StreamInfo>,
    elapsed_secs: f64,
) -> Option<BackendCommand> {
    let mut command = None;

    ui.horizontal(|ui| {
        if ui.button("⬅ Exit AR").clicked() {
            command = Some(BackendCommand::ExitAr);
        }
        ui.label(RichText::new(&view.record_name).strong().size(18.0));
        ui.label(RichText::new("● LIVE").color(LIVE_RED).small());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let audio = if view.audio_playing {
                "🔊 Audio guide"
            } else {
                "🔇 Audio guide"
            };
            if ui.selectable_label(view.audio_playing, audio).clicked() {
                command = Some(BackendCommand::ToggleAudio);
            }
            if ui.button("⟲ Reset view").clicked() {
                command = Some(BackendCommand::ResetView);
            }
            if ui
                .selectable_label(view.info_panel.is_some(), "ℹ Info")
                .clicked()
            {
                command = Some(BackendCommand::ToggleInfoPanel);
            }
        });
    });

    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let painter = ui.painter_at(rect);
    paint_feed(&painter, rect, feed);

    for marker in &view.markers {
        let center = marker_center(rect, marker.position);
        let radius = marker_radius(marker);
        let hit = Rect::from_center_size(center, egui::vec2(radius * 2.0, radius * 2.0));
        let response = ui.interact(
            hit,
            ui.make_persistent_id(("hotspot", marker.hotspot_id.as_str())),
            Sense::click(),
        );

        painter.circle_filled(center, radius, marker_fill(marker.tone));
        painter.circle_stroke(center, radius, Stroke::new(2.0, Color32::WHITE));
        painter.text(
            center + egui::vec2(0.0, radius + 6.0),
            Align2::CENTER_TOP,
            &marker.label,
            FontId::proportional(13.0),
            Color32::WHITE,
        );

        if response.clicked() {
            command = Some(BackendCommand::SelectHotspot {
                id: marker.hotspot_id.clone(),
            });
        }
    }

    if let Some(info) = &view.info_panel {
        let panel = Rect::from_min_size(
            egui::pos2(rect.right() - 336.0, rect.top() + 16.0),
            egui::vec2(320.0, (rect.height() * 0.55).max(180.0)),
        );
        painter.rect_filled(panel, CornerRadius::same(8), PANEL_BG);
        ui_in_rect(ui, panel.shrink(12.0), |ui| {
            ui.label(RichText::new(&info.name).strong().size(16.0).color(Color32::WHITE));
            ui.label(RichText::new(&info.location).small().color(PANEL_TEXT));
            ui.add_space(6.0);
            egui::Grid::new("ar_info_metrics")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for (label, value) in [
                        ("Temperature", &info.temperature),
                        ("Depth", &info.depth),
                        ("Flow", &info.flow),
                    ] {
                        ui.label(RichText::new(label).color(PANEL_TEXT));
                        ui.label(RichText::new(value).color(Color32::WHITE));
                        ui.end_row();
                    }
                });
            ui.add_space(6.0);
            for feature in &info.features {
                ui.label(RichText::new(format!("• {feature}")).color(PANEL_TEXT));
            }
            ui.add_space(6.0);
            ui.label(RichText::new(&info.legend).italics().color(PANEL_TEXT));
        });
    }

    if let Some(panel) = &view.hotspot_panel {
        let card = Rect::from_min_max(
            egui::pos2(rect.left() + 16.0, rect.bottom() - 124.0),
            egui::pos2(rect.right() - 120.0, rect.bottom() - 16.0),
        );
        painter.rect_filled(card, CornerRadius::same(8), PANEL_BG);
        ui_in_rect(ui, card.shrink(12.0), |ui| {
            ui.label(RichText::new(&panel.name).strong().size(16.0).color(ACTIVE_MARKER));
            ui.label(RichText::new(&panel.info).color(PANEL_TEXT));
        });
    }

    paint_compass(
        &painter,
        egui::pos2(rect.right() - 56.0, rect.bottom() - 56.0),
        elapsed_secs,
    );
    paint_status(&painter, rect, feed);

    command
}

fn paint_feed(painter: &egui::Painter, rect: Rect, feed: Option<&StreamInfo>) {
    let Some(feed) = feed else {
        painter.rect_filled(rect, CornerRadius::same(4), Color32::BLACK);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Waiting for camera feed...",
            FontId::proportional(16.0),
            Color32::GRAY,
        );
        return;
    };

    painter.rect_filled(rect, CornerRadius::same(4), Color32::from_rgb(28, 46, 52));
    let water = Rect::from_min_max(egui::pos2(rect.left(), rect.center().y), rect.max);
    painter.rect_filled(water, CornerRadius::ZERO, Color32::from_rgb(22, 78, 99));

    let grid = Stroke::new(1.0, Color32::from_white_alpha(18));
    for step in 1..8 {
        let x = rect.left() + rect.width() * step as f32 / 8.0;
        painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], grid);
        let y = rect.top() + rect.height() * step as f32 / 8.0;
        painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], grid);
    }

    let short_id: String = feed.stream_id.to_string().chars().take(8).collect();
    painter.text(
        rect.left_top() + egui::vec2(12.0, 10.0),
        Align2::LEFT_TOP,
        format!("{} camera · stream {short_id}", feed.facing.label()),
        FontId::monospace(11.0),
        Color32::from_white_alpha(160),
    );
}

fn paint_compass(painter: &egui::Painter, center: Pos2, elapsed_secs: f64) {
    let radius = 32.0;
    painter.circle_filled(center, radius, PANEL_BG);
    painter.circle_stroke(center, radius, Stroke::new(1.5, PANEL_TEXT));

    let heading = (elapsed_secs as f32 * 0.15) % TAU;
    let tip = center + egui::vec2(heading.sin(), -heading.cos()) * (radius - 6.0);
    let tail = center - egui::vec2(heading.sin(), -heading.cos()) * (radius - 12.0);
    painter.line_segment([center, tip], Stroke::new(3.0, LIVE_RED));
    painter.line_segment([center, tail], Stroke::new(3.0, PANEL_TEXT));
    painter.text(
        tip,
        Align2::CENTER_BOTTOM,
        "N",
        FontId::proportional(11.0),
        Color32::WHITE,
    );
}

fn paint_status(painter: &egui::Painter, rect: Rect, feed: Option<&StreamInfo>) {
    let (color, text) = match feed {
        Some(feed) => (
            Color32::from_rgb(34, 197, 94),
            format!("Tracking · {} track(s)", feed.live_tracks),
        ),
        None => (Color32::from_rgb(234, 179, 8), "Starting camera".to_string()),
    };
    let dot = egui::pos2(rect.left() + 20.0, rect.bottom() - 146.0);
    painter.circle_filled(dot, 5.0, color);
    painter.text(
        dot + egui::vec2(12.0, 0.0),
        Align2::LEFT_CENTER,
        text,
        FontId::proportional(12.0),
        Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use guide_core::overlay::{ACTIVE_MARKER_SCALE, IDLE_MARKER_SCALE};
    use shared::domain::HotspotId;

    use super::*;

    fn marker(scale: f32, tone: MarkerTone) -> MarkerVisual {
        MarkerVisual {
            hotspot_id: HotspotId::new("main-spring"),
            label: "主泉眼".to_string(),
            position: Position::new(45.0, 55.0),
            scale,
            tone,
        }
    }

    #[test]
    fn markers_are_placed_by_percentage() {
        let rect = Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(800.0, 400.0));
        let center = marker_center(rect, Position::new(45.0, 55.0));
        assert!((center.x - 460.0).abs() < 1e-3);
        assert!((center.y - 270.0).abs() < 1e-3);

        assert_eq!(marker_center(rect, Position::new(0.0, 0.0)), rect.min);
        assert_eq!(marker_center(rect, Position::new(100.0, 100.0)), rect.max);
    }

    #[test]
    fn active_markers_are_larger_and_yellow() {
        let idle = marker(IDLE_MARKER_SCALE, MarkerTone::Idle);
        let active = marker(ACTIVE_MARKER_SCALE, MarkerTone::Highlighted);

        assert!(marker_radius(&active) > marker_radius(&idle));
        assert!((marker_radius(&active) - MARKER_RADIUS * 1.25).abs() < 1e-3);
        assert_eq!(marker_fill(active.tone), ACTIVE_MARKER);
        assert_eq!(marker_fill(idle.tone), IDLE_MARKER);
    }
}
