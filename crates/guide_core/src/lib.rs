//! Core of the spring AR guide: camera session lifecycle, hotspot overlay and
//! the view state machine that ties them together.

use std::sync::Arc;

use catalog::Catalog;
use media_capture::{CaptureConstraints, MediaCaptureDevice};

pub mod camera;
pub mod config;
pub mod overlay;
pub mod view;

pub use camera::{CameraEvent, CameraSessionManager, PermissionState};
pub use config::GuideSettings;
pub use overlay::{
    compose_ar_view, render_markers, ArViewModel, HotspotPanel, MarkerTone, MarkerVisual,
    OverlayAction, OverlayState, RecordPanel,
};
pub use view::{CameraTicket, ViewController, ViewError, ViewMode, ViewSnapshot};

/// Wires a catalog and a capture device into a controller in the catalog view.
pub fn build_controller(
    catalog: Arc<Catalog>,
    device: Arc<dyn MediaCaptureDevice>,
    constraints: CaptureConstraints,
) -> ViewController {
    let camera = Arc::new(CameraSessionManager::new(device, constraints));
    ViewController::new(catalog, camera)
}
