//! Hotspot overlay: selection state and the marker/panel views derived from it.

use std::sync::Arc;

use shared::{
    domain::{HotspotId, Position, SpringRecord},
    error::OverlayError,
};
use tracing::{debug, warn};

pub const ACTIVE_MARKER_SCALE: f32 = 1.25;
pub const IDLE_MARKER_SCALE: f32 = 1.0;

#[derive(Debug, Clone)]
pub enum OverlayAction {
    SelectRecord(Arc<SpringRecord>),
    ClearRecord,
    EnterAr,
    LeaveAr,
    SelectHotspot(HotspotId),
    ResetView,
    ToggleInfoPanel,
    ToggleAudio,
}

/// Selection and panel flags for the record being viewed.
///
/// Fields are only changed through [`OverlayState::apply`], which validates
/// an action completely before touching any field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayState {
    selected_record: Option<Arc<SpringRecord>>,
    is_ar_active: bool,
    active_hotspot_id: Option<HotspotId>,
    info_panel_visible: bool,
    audio_playing: bool,
}

impl OverlayState {
    pub fn selected_record(&self) -> Option<&Arc<SpringRecord>> {
        self.selected_record.as_ref()
    }

    pub fn is_ar_active(&self) -> bool {
        self.is_ar_active
    }

    pub fn active_hotspot_id(&self) -> Option<&HotspotId> {
        self.active_hotspot_id.as_ref()
    }

    pub fn info_panel_visible(&self) -> bool {
        self.info_panel_visible
    }

    pub fn audio_playing(&self) -> bool {
        self.audio_playing
    }

    pub fn apply(&mut self, action: OverlayAction) -> Result<(), OverlayError> {
        match action {
            OverlayAction::SelectRecord(record) => {
                self.selected_record = Some(record);
                self.is_ar_active = false;
                self.active_hotspot_id = None;
            }
            OverlayAction::ClearRecord => {
                *self = Self::default();
            }
            OverlayAction::EnterAr => {
                if self.selected_record.is_none() {
                    return Err(OverlayError::NoRecordSelected);
                }
                self.is_ar_active = true;
            }
            OverlayAction::LeaveAr => {
                self.is_ar_active = false;
            }
            OverlayAction::SelectHotspot(id) => {
                let record = self
                    .selected_record
                    .as_ref()
                    .ok_or(OverlayError::NoRecordSelected)?;
                if !record.has_hotspot(&id) {
                    return Err(OverlayError::InvalidHotspotReference {
                        record: record.id.clone(),
                        hotspot: id,
                    });
                }
                if self.active_hotspot_id.as_ref() == Some(&id) {
                    self.active_hotspot_id = None;
                } else {
                    self.active_hotspot_id = Some(id);
                }
            }
            OverlayAction::ResetView => {
                self.active_hotspot_id = None;
            }
            OverlayAction::ToggleInfoPanel => {
                self.info_panel_visible = !self.info_panel_visible;
            }
            OverlayAction::ToggleAudio => {
                self.audio_playing = !self.audio_playing;
            }
        }
        Ok(())
    }

    /// Toggles the hotspot. Unknown ids leave the state untouched and are
    /// only reported to the log.
    pub fn select_hotspot(&mut self, id: &HotspotId) -> &Self {
        match self.apply(OverlayAction::SelectHotspot(id.clone())) {
            Ok(()) => debug!(
                hotspot = %id,
                active = self.active_hotspot_id.is_some(),
                "overlay: hotspot toggled"
            ),
            Err(err) => warn!(error = %err, "overlay: ignored hotspot selection"),
        }
        self
    }

    pub fn reset_view(&mut self) -> &Self {
        self.apply_infallible(OverlayAction::ResetView)
    }

    pub fn toggle_info_panel(&mut self) -> &Self {
        self.apply_infallible(OverlayAction::ToggleInfoPanel)
    }

    pub fn toggle_audio(&mut self) -> &Self {
        self.apply_infallible(OverlayAction::ToggleAudio)
    }

    // Panel toggles and reset have no preconditions.
    fn apply_infallible(&mut self, action: OverlayAction) -> &Self {
        if let Err(err) = self.apply(action) {
            warn!(error = %err, "overlay: action rejected");
        }
        self
    }

    /// Active hotspot always belongs to the selected record, and AR needs a record.
    pub fn invariants_hold(&self) -> bool {
        let hotspot_ok = match (&self.active_hotspot_id, &self.selected_record) {
            (Some(id), Some(record)) => record.has_hotspot(id),
            (Some(_), None) => false,
            (None, _) => true,
        };
        hotspot_ok && (!self.is_ar_active || self.selected_record.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerTone {
    Idle,
    Highlighted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerVisual {
    pub hotspot_id: HotspotId,
    pub label: String,
    pub position: Position,
    pub scale: f32,
    pub tone: MarkerTone,
}

impl MarkerVisual {
    pub fn is_active(&self) -> bool {
        self.tone == MarkerTone::Highlighted
    }
}

/// One marker per hotspot, in record order.
pub fn render_markers(record: &SpringRecord, active: Option<&HotspotId>) -> Vec<MarkerVisual> {
    record
        .hotspots
        .iter()
        .map(|hotspot| {
            let is_active = active == Some(&hotspot.id);
            MarkerVisual {
                hotspot_id: hotspot.id.clone(),
                label: hotspot.name.clone(),
                position: hotspot.position,
                scale: if is_active {
                    ACTIVE_MARKER_SCALE
                } else {
                    IDLE_MARKER_SCALE
                },
                tone: if is_active {
                    MarkerTone::Highlighted
                } else {
                    MarkerTone::Idle
                },
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotspotPanel {
    pub hotspot_id: HotspotId,
    pub name: String,
    pub info: String,
}

pub fn hotspot_panel(record: &SpringRecord, active: Option<&HotspotId>) -> Option<HotspotPanel> {
    let hotspot = record.hotspot(active?)?;
    Some(HotspotPanel {
        hotspot_id: hotspot.id.clone(),
        name: hotspot.name.clone(),
        info: hotspot.info.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPanel {
    pub name: String,
    pub location: String,
    pub temperature: String,
    pub depth: String,
    pub flow: String,
    pub legend: String,
    pub features: Vec<String>,
}

pub fn record_panel(record: &SpringRecord) -> RecordPanel {
    RecordPanel {
        name: record.name.clone(),
        location: record.location.clone(),
        temperature: record.temperature.clone(),
        depth: record.depth.clone(),
        flow: record.flow.clone(),
        legend: record.legend.clone(),
        features: record.features.clone(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArViewModel {
    pub record_name: String,
    pub markers: Vec<MarkerVisual>,
    pub hotspot_panel: Option<HotspotPanel>,
    pub info_panel: Option<RecordPanel>,
    pub audio_playing: bool,
}

/// Everything the AR view draws over the feed. `None` outside AR mode.
pub fn compose_ar_view(state: &OverlayState) -> Option<ArViewModel> {
    if !state.is_ar_active {
        return None;
    }
    let record = state.selected_record.as_deref()?;
    let active = state.active_hotspot_id.as_ref();

    Some(ArViewModel {
        record_name: record.name.clone(),
        markers: render_markers(record, active),
        hotspot_panel: hotspot_panel(record, active),
        info_panel: state.info_panel_visible.then(|| record_panel(record)),
        audio_playing: state.audio_playing,
    })
}

#[cfg(test)]
#[path = "tests/overlay_tests.rs"]
mod tests;
