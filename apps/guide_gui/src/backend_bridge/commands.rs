use shared::domain::{HotspotId, SpringId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    SelectRecord { id: SpringId },
    BackToCatalog,
    StartAr,
    RetryPermission,
    ExitAr,
    SelectHotspot { id: HotspotId },
    ResetView,
    ToggleInfoPanel,
    ToggleAudio,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectRecord { .. } => "select_record",
            Self::BackToCatalog => "back_to_catalog",
            Self::StartAr => "start_ar",
            Self::RetryPermission => "retry_permission",
            Self::ExitAr => "exit_ar",
            Self::SelectHotspot { .. } => "select_hotspot",
            Self::ResetView => "reset_view",
            Self::ToggleInfoPanel => "toggle_info_panel",
            Self::ToggleAudio => "toggle_audio",
        }
    }
}
