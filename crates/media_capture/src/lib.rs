//! Platform media-capture seam: camera stream acquisition and render targets.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod simulated;

pub use simulated::{CameraPolicy, SimulatedCamera};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// Rear camera.
    #[default]
    Environment,
    User,
}

impl FacingMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureConstraints {
    pub facing: FacingMode,
    pub audio: bool,
}

impl CaptureConstraints {
    pub fn video(facing: FacingMode) -> Self {
        Self {
            facing,
            audio: false,
        }
    }
}

/// Failure names reported by the platform capture API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureFailure {
    #[error("NotAllowedError: {0}")]
    NotAllowed(String),
    #[error("NotFoundError: no camera matches the requested constraints")]
    NotFound,
    #[error("NotReadableError: {0}")]
    NotReadable(String),
    #[error("OverconstrainedError: {0}")]
    Overconstrained(String),
    #[error("{0}")]
    Other(String),
}

impl CaptureFailure {
    /// The user or the platform refused access, as opposed to a device fault.
    pub fn is_permission_refusal(&self) -> bool {
        matches!(self, Self::NotAllowed(_))
    }
}

/// Read-only description of a live stream, handed to render targets and callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub stream_id: Uuid,
    pub facing: FacingMode,
    pub live_tracks: usize,
    pub acquired_at: DateTime<Utc>,
}

pub trait MediaStream: Send + Sync {
    fn id(&self) -> Uuid;
    fn facing(&self) -> FacingMode;
    fn live_track_count(&self) -> usize;
    /// Stops every track. Calling it again is harmless.
    fn stop_all_tracks(&self);
}

#[async_trait]
pub trait MediaCaptureDevice: Send + Sync {
    async fn request_stream(
        &self,
        constraints: CaptureConstraints,
    ) -> Result<Arc<dyn MediaStream>, CaptureFailure>;
}

/// Surface that displays the live feed underneath the overlay.
pub trait VideoSink: Send + Sync {
    fn attach(&self, stream: &StreamInfo);
    fn detach(&self);
}
