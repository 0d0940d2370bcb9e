//! Top-level mode machine: catalog, detail and AR views.

use std::sync::Arc;

use catalog::Catalog;
use media_capture::StreamInfo;
use shared::{
    domain::{HotspotId, SpringId, SpringRecord},
    error::{CameraError, ErrorCode, GuideError, OverlayError},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    camera::{CameraSessionManager, PermissionState},
    overlay::{compose_ar_view, ArViewModel, OverlayAction, OverlayState},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewMode {
    Catalog,
    Detail(Arc<SpringRecord>),
    ArActive(Arc<SpringRecord>),
}

impl ViewMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Detail(_) => "detail",
            Self::ArActive(_) => "ar",
        }
    }

    pub fn record(&self) -> Option<&Arc<SpringRecord>> {
        match self {
            Self::Catalog => None,
            Self::Detail(record) | Self::ArActive(record) => Some(record),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("unknown spring record {0}")]
    UnknownRecord(SpringId),
    #[error("cannot {action} from the {mode} view")]
    InvalidTransition {
        action: &'static str,
        mode: &'static str,
    },
    #[error(transparent)]
    Overlay(#[from] OverlayError),
    #[error(transparent)]
    Camera(#[from] CameraError),
}

impl ViewError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownRecord(_) => ErrorCode::UnknownRecord,
            Self::InvalidTransition { .. } => ErrorCode::Validation,
            Self::Overlay(err) => err.code(),
            Self::Camera(err) => err.code(),
        }
    }
}

impl From<ViewError> for GuideError {
    fn from(value: ViewError) -> Self {
        GuideError::new(value.code(), value.to_string())
    }
}

/// Identifies one camera request started from the detail view. Outcomes are
/// handed back with their ticket so that a request cancelled by navigation
/// cannot settle a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub mode: ViewMode,
    pub overlay: OverlayState,
    pub permission: PermissionState,
    pub activation_pending: bool,
    pub camera_notice: Option<CameraError>,
    pub live_tracks: usize,
    pub ar_view: Option<ArViewModel>,
}

pub struct ViewController {
    catalog: Arc<Catalog>,
    camera: Arc<CameraSessionManager>,
    mode: ViewMode,
    overlay: OverlayState,
    activation: Option<CameraTicket>,
    retry: Option<CameraTicket>,
    next_ticket: u64,
}

impl ViewController {
    pub fn new(catalog: Arc<Catalog>, camera: Arc<CameraSessionManager>) -> Self {
        Self {
            catalog,
            camera,
            mode: ViewMode::Catalog,
            overlay: OverlayState::default(),
            activation: None,
            retry: None,
            next_ticket: 0,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn camera(&self) -> &Arc<CameraSessionManager> {
        &self.camera
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn is_activation_pending(&self) -> bool {
        self.activation.is_some()
    }

    /// The denial to show with a retry affordance, if the camera was refused.
    pub fn camera_notice(&self) -> Option<CameraError> {
        match self.camera.permission_state() {
            PermissionState::Denied(err) => Some(err),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            mode: self.mode.clone(),
            overlay: self.overlay.clone(),
            permission: self.camera.permission_state(),
            activation_pending: self.activation.is_some(),
            camera_notice: self.camera_notice(),
            live_tracks: self.camera.live_track_count(),
            ar_view: compose_ar_view(&self.overlay),
        }
    }

    pub fn select_record(&mut self, id: &SpringId) -> Result<(), ViewError> {
        if !matches!(self.mode, ViewMode::Catalog) {
            return Err(self.invalid("select a record"));
        }
        let record = self
            .catalog
            .get(id)
            .ok_or_else(|| ViewError::UnknownRecord(id.clone()))?;

        self.overlay
            .apply(OverlayAction::SelectRecord(Arc::clone(&record)))?;
        info!(record = %record.id, "view: catalog -> detail");
        self.mode = ViewMode::Detail(record);
        Ok(())
    }

    pub fn back_to_catalog(&mut self) -> Result<(), ViewError> {
        if !matches!(self.mode, ViewMode::Detail(_)) {
            return Err(self.invalid("go back to the catalog"));
        }
        self.camera.deactivate();
        self.forget_camera_requests();
        self.overlay.apply(OverlayAction::ClearRecord)?;
        self.mode = ViewMode::Catalog;
        info!("view: detail -> catalog");
        Ok(())
    }

    /// Marks an AR activation as in flight and returns its ticket. Returns
    /// `None` when one already is, in which case the caller must not start
    /// another acquisition.
    pub fn begin_start_ar(&mut self) -> Result<Option<CameraTicket>, ViewError> {
        if !matches!(self.mode, ViewMode::Detail(_)) {
            return Err(self.invalid("start AR"));
        }
        if self.activation.is_some() {
            debug!("view: AR activation already pending");
            return Ok(None);
        }
        let ticket = self.issue_ticket();
        self.activation = Some(ticket);
        Ok(Some(ticket))
    }

    /// Applies the camera outcome of the activation `ticket` was issued for.
    /// Outcomes of activations cancelled in the meantime are dropped.
    pub fn finish_start_ar(
        &mut self,
        ticket: CameraTicket,
        result: Result<StreamInfo, CameraError>,
    ) -> Result<(), ViewError> {
        if self.activation != Some(ticket) {
            self.settle_stale(ticket, result.is_ok());
            return Ok(());
        }
        self.activation = None;

        let ViewMode::Detail(record) = &self.mode else {
            return Err(self.invalid("enter AR"));
        };
        let record = Arc::clone(record);

        match result {
            Ok(stream) => {
                self.overlay.apply(OverlayAction::EnterAr)?;
                info!(
                    record = %record.id,
                    stream = %stream.stream_id,
                    "view: detail -> ar"
                );
                self.mode = ViewMode::ArActive(record);
                Ok(())
            }
            Err(err) => {
                warn!(record = %record.id, error = %err, "view: AR unavailable, staying in detail");
                Err(err.into())
            }
        }
    }

    /// `Detail -> ArActive` once the camera holds a stream.
    pub async fn start_ar(&mut self) -> Result<(), ViewError> {
        let Some(ticket) = self.begin_start_ar()? else {
            return Ok(());
        };
        let result = self.camera.activate().await;
        self.finish_start_ar(ticket, result)
    }

    /// Checks that a permission retry is allowed from the current view and
    /// returns its ticket. Callers driving the camera themselves follow up
    /// with [`CameraSessionManager::request_permission`] and hand the outcome
    /// to [`Self::finish_retry_permission`].
    pub fn begin_retry_permission(&mut self) -> Result<CameraTicket, ViewError> {
        if !matches!(self.mode, ViewMode::Detail(_)) {
            return Err(self.invalid("retry camera permission"));
        }
        info!("view: retrying camera permission");
        let ticket = self.issue_ticket();
        self.retry = Some(ticket);
        Ok(ticket)
    }

    /// Applies the outcome of a permission retry. A retry abandoned by leaving
    /// the detail view reports `Cancelled` and gives its stream back.
    pub fn finish_retry_permission(
        &mut self,
        ticket: CameraTicket,
        result: Result<StreamInfo, CameraError>,
    ) -> Result<StreamInfo, ViewError> {
        if self.retry != Some(ticket) {
            self.settle_stale(ticket, result.is_ok());
            return Err(CameraError::Cancelled.into());
        }
        self.retry = None;
        Ok(result?)
    }

    /// Re-prompts for camera access after a denial. Stays in the detail view.
    pub async fn retry_permission(&mut self) -> Result<StreamInfo, ViewError> {
        let ticket = self.begin_retry_permission()?;
        let result = self.camera.request_permission().await;
        self.finish_retry_permission(ticket, result)
    }

    /// `ArActive -> Detail`. The camera is released first; in the detail view
    /// this cancels a pending activation.
    pub fn exit_ar(&mut self) -> Result<(), ViewError> {
        match &self.mode {
            ViewMode::Catalog => Err(self.invalid("exit AR")),
            ViewMode::Detail(_) => {
                self.camera.deactivate();
                self.forget_camera_requests();
                Ok(())
            }
            ViewMode::ArActive(record) => {
                let record = Arc::clone(record);
                self.camera.deactivate();
                self.forget_camera_requests();
                self.overlay.apply(OverlayAction::LeaveAr)?;
                info!(record = %record.id, "view: ar -> detail");
                self.mode = ViewMode::Detail(record);
                Ok(())
            }
        }
    }

    /// Releases the camera whatever the current view. Used on shutdown.
    pub fn teardown(&mut self) {
        self.camera.deactivate();
        self.forget_camera_requests();
        if let ViewMode::ArActive(record) = &self.mode {
            let record = Arc::clone(record);
            let _ = self.overlay.apply(OverlayAction::LeaveAr);
            self.mode = ViewMode::Detail(record);
        }
    }

    pub fn select_hotspot(&mut self, id: &HotspotId) -> &OverlayState {
        self.overlay.select_hotspot(id)
    }

    pub fn reset_view(&mut self) -> &OverlayState {
        self.overlay.reset_view()
    }

    pub fn toggle_info_panel(&mut self) -> &OverlayState {
        self.overlay.toggle_info_panel()
    }

    pub fn toggle_audio(&mut self) -> &OverlayState {
        self.overlay.toggle_audio()
    }

    fn issue_ticket(&mut self) -> CameraTicket {
        self.next_ticket += 1;
        CameraTicket(self.next_ticket)
    }

    fn forget_camera_requests(&mut self) {
        self.activation = None;
        self.retry = None;
    }

    /// A request that was cancelled before it reached the camera still comes
    /// back with a live stream. Joiners share that stream, so it is only
    /// released when nothing else is waiting on it and AR is not showing it.
    fn settle_stale(&self, ticket: CameraTicket, granted: bool) {
        let in_use = self.activation.is_some()
            || self.retry.is_some()
            || matches!(self.mode, ViewMode::ArActive(_));
        if granted && !in_use {
            debug!(?ticket, "view: releasing stream of a cancelled camera request");
            self.camera.deactivate();
        } else {
            debug!(?ticket, "view: dropping outcome of a cancelled camera request");
        }
    }

    fn invalid(&self, action: &'static str) -> ViewError {
        ViewError::InvalidTransition {
            action,
            mode: self.mode.name(),
        }
    }
}

impl Drop for ViewController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
