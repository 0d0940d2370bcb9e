use super::*;

use catalog::Catalog;
use shared::domain::SpringId;

fn record(id: &str) -> Arc<SpringRecord> {
    Catalog::builtin()
        .get(&SpringId::new(id))
        .expect("builtin record")
}

fn state_for(id: &str) -> OverlayState {
    let mut state = OverlayState::default();
    state
        .apply(OverlayAction::SelectRecord(record(id)))
        .expect("select record");
    state
}

fn hotspot(id: &str) -> HotspotId {
    HotspotId::new(id)
}

#[test]
fn markers_cover_every_hotspot_at_its_declared_position() {
    for record in Catalog::builtin().records() {
        let markers = render_markers(record, None);

        assert_eq!(markers.len(), record.hotspots.len());
        for (marker, hotspot) in markers.iter().zip(&record.hotspots) {
            assert_eq!(marker.hotspot_id, hotspot.id);
            assert_eq!(marker.position, hotspot.position);
            assert_eq!(marker.label, hotspot.name);
            assert!(!marker.is_active());
            assert_eq!(marker.scale, IDLE_MARKER_SCALE);
        }
    }
}

#[test]
fn only_the_active_marker_is_emphasized() {
    let baotu = record("baotu");
    let active = hotspot("pavilion");

    let markers = render_markers(&baotu, Some(&active));

    let emphasized: Vec<_> = markers.iter().filter(|m| m.is_active()).collect();
    assert_eq!(emphasized.len(), 1);
    assert_eq!(emphasized[0].hotspot_id, active);
    assert_eq!(emphasized[0].scale, ACTIVE_MARKER_SCALE);
    assert_eq!(emphasized[0].tone, MarkerTone::Highlighted);
}

#[test]
fn selecting_the_same_hotspot_twice_clears_the_selection() {
    let mut state = state_for("baotu");
    let main = hotspot("main-spring");

    state.select_hotspot(&main);
    assert_eq!(state.active_hotspot_id(), Some(&main));

    state.select_hotspot(&main);
    assert_eq!(state.active_hotspot_id(), None);
}

#[test]
fn selecting_another_hotspot_replaces_the_previous_one() {
    let mut state = state_for("baotu");

    state.select_hotspot(&hotspot("main-spring"));
    state.select_hotspot(&hotspot("stone-tablet"));

    assert_eq!(state.active_hotspot_id(), Some(&hotspot("stone-tablet")));
    let markers = render_markers(&record("baotu"), state.active_hotspot_id());
    assert_eq!(markers.iter().filter(|m| m.is_active()).count(), 1);
}

#[test]
fn foreign_hotspot_ids_leave_the_selection_unchanged() {
    let mut state = state_for("baotu");
    state.select_hotspot(&hotspot("pavilion"));
    let before = state.clone();

    state.select_hotspot(&hotspot("tiger-heads"));
    assert_eq!(state, before);

    let err = state
        .apply(OverlayAction::SelectHotspot(hotspot("tiger-heads")))
        .expect_err("foreign hotspot");
    assert_eq!(
        err,
        OverlayError::InvalidHotspotReference {
            record: SpringId::new("baotu"),
            hotspot: hotspot("tiger-heads"),
        }
    );
    assert_eq!(state, before);
    assert!(state.invariants_hold());
}

#[test]
fn hotspot_selection_without_a_record_is_rejected() {
    let mut state = OverlayState::default();
    let err = state
        .apply(OverlayAction::SelectHotspot(hotspot("main-spring")))
        .expect_err("no record");
    assert_eq!(err, OverlayError::NoRecordSelected);
    assert_eq!(state.active_hotspot_id(), None);
}

#[test]
fn entering_ar_requires_a_record() {
    let mut state = OverlayState::default();
    assert_eq!(
        state.apply(OverlayAction::EnterAr),
        Err(OverlayError::NoRecordSelected)
    );
    assert!(!state.is_ar_active());
}

#[test]
fn reset_view_only_clears_the_active_hotspot() {
    let mut state = state_for("heihu");
    state.apply(OverlayAction::EnterAr).expect("enter ar");
    state.toggle_info_panel();
    state.select_hotspot(&hotspot("spring-pool"));

    state.reset_view();

    assert_eq!(state.active_hotspot_id(), None);
    assert!(state.is_ar_active());
    assert!(state.info_panel_visible());
}

#[test]
fn info_panel_and_hotspot_selection_are_independent() {
    let mut state = state_for("zhenzhu");
    state.apply(OverlayAction::EnterAr).expect("enter ar");
    state.select_hotspot(&hotspot("wishing-well"));
    state.toggle_info_panel();

    let view = compose_ar_view(&state).expect("ar view");
    assert!(view.hotspot_panel.is_some());
    assert!(view.info_panel.is_some());

    state.toggle_info_panel();
    assert_eq!(state.active_hotspot_id(), Some(&hotspot("wishing-well")));
    let view = compose_ar_view(&state).expect("ar view");
    assert!(view.info_panel.is_none());
}

#[test]
fn audio_flag_toggles_without_touching_other_state() {
    let mut state = state_for("baotu");
    state.select_hotspot(&hotspot("pavilion"));

    state.toggle_audio();
    assert!(state.audio_playing());
    assert_eq!(state.active_hotspot_id(), Some(&hotspot("pavilion")));

    state.toggle_audio();
    assert!(!state.audio_playing());
}

#[test]
fn selecting_a_new_record_drops_the_old_hotspot() {
    let mut state = state_for("baotu");
    state.select_hotspot(&hotspot("main-spring"));

    state
        .apply(OverlayAction::SelectRecord(record("wulongtan")))
        .expect("select");

    assert_eq!(state.active_hotspot_id(), None);
    assert!(state.invariants_hold());
}

#[test]
fn clearing_the_record_resets_everything() {
    let mut state = state_for("baotu");
    state.apply(OverlayAction::EnterAr).expect("enter ar");
    state.toggle_info_panel();
    state.toggle_audio();

    state.apply(OverlayAction::ClearRecord).expect("clear");

    assert_eq!(state, OverlayState::default());
}

#[test]
fn hotspot_panel_shows_the_active_hotspot_text() {
    let baotu = record("baotu");
    let panel = hotspot_panel(&baotu, Some(&hotspot("main-spring"))).expect("panel");

    assert_eq!(panel.name, "主泉眼");
    assert_eq!(
        panel.info,
        "三股泉水并发，声如隐雷，势如鼎沸，是趵突泉的核心景观"
    );
    assert!(hotspot_panel(&baotu, None).is_none());
}

#[test]
fn record_panel_carries_metrics_legend_and_features() {
    let panel = record_panel(&record("heihu"));

    assert_eq!(panel.temperature, "17°C");
    assert_eq!(panel.depth, "3.8米");
    assert_eq!(panel.flow, "180立方米/小时");
    assert_eq!(panel.features.len(), 4);
}

#[test]
fn ar_view_is_only_composed_in_ar_mode() {
    let mut state = state_for("baotu");
    assert!(compose_ar_view(&state).is_none());

    state.apply(OverlayAction::EnterAr).expect("enter ar");
    let view = compose_ar_view(&state).expect("ar view");
    assert_eq!(view.record_name, "趵突泉");
    assert_eq!(view.markers.len(), 3);
    assert!(view.hotspot_panel.is_none());

    state.apply(OverlayAction::LeaveAr).expect("leave ar");
    assert!(compose_ar_view(&state).is_none());
}
