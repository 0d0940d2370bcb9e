//! Camera session lifecycle: permission request, stream ownership, release.
//!
//! The manager is the only owner of the platform stream. Callers see
//! [`StreamInfo`] snapshots and [`PermissionState`] transitions, never the
//! stream itself.
//!
//! Render targets and streams are called with the session lock released, so
//! a sink may read the manager's state from `attach`/`detach`. Sink
//! notifications are serialized by a second lock, taken before the session
//! lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use media_capture::{
    CaptureConstraints, CaptureFailure, MediaCaptureDevice, MediaStream, StreamInfo, VideoSink,
};
use shared::error::CameraError;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

type Outcome = Option<Result<StreamInfo, CameraError>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionState {
    Unacquired,
    Pending,
    Acquired(StreamInfo),
    Denied(CameraError),
}

impl PermissionState {
    pub fn is_acquired(&self) -> bool {
        matches!(self, Self::Acquired(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unacquired => "unacquired",
            Self::Pending => "pending",
            Self::Acquired(_) => "acquired",
            Self::Denied(_) => "denied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraEvent {
    PermissionChanged(PermissionState),
}

enum Phase {
    Unacquired,
    Pending {
        generation: u64,
        outcome: watch::Receiver<Outcome>,
    },
    Acquired {
        stream: Arc<dyn MediaStream>,
        info: StreamInfo,
    },
    Denied(CameraError),
}

impl Phase {
    fn permission_state(&self) -> PermissionState {
        match self {
            Self::Unacquired => PermissionState::Unacquired,
            Self::Pending { .. } => PermissionState::Pending,
            Self::Acquired { info, .. } => PermissionState::Acquired(info.clone()),
            Self::Denied(err) => PermissionState::Denied(err.clone()),
        }
    }
}

struct SessionState {
    phase: Phase,
    generation: u64,
}

enum Start {
    Held(StreamInfo),
    Join(watch::Receiver<Outcome>),
    Fresh {
        generation: u64,
        publish: watch::Sender<Outcome>,
    },
}

pub struct CameraSessionManager {
    device: Arc<dyn MediaCaptureDevice>,
    constraints: CaptureConstraints,
    state: Mutex<SessionState>,
    render_target: Mutex<Option<Arc<dyn VideoSink>>>,
    events: broadcast::Sender<CameraEvent>,
}

impl CameraSessionManager {
    pub fn new(device: Arc<dyn MediaCaptureDevice>, constraints: CaptureConstraints) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            device,
            constraints,
            state: Mutex::new(SessionState {
                phase: Phase::Unacquired,
                generation: 0,
            }),
            render_target: Mutex::new(None),
            events,
        }
    }

    pub fn constraints(&self) -> CaptureConstraints {
        self.constraints
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CameraEvent> {
        self.events.subscribe()
    }

    pub fn permission_state(&self) -> PermissionState {
        self.lock_state().phase.permission_state()
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.lock_state().phase, Phase::Acquired { .. })
    }

    pub fn live_track_count(&self) -> usize {
        match &self.lock_state().phase {
            Phase::Acquired { stream, .. } => stream.live_track_count(),
            _ => 0,
        }
    }

    /// Sets the surface the live feed is shown on. A stream that is already
    /// held is attached immediately.
    pub fn bind_render_target(&self, target: Arc<dyn VideoSink>) {
        let mut render = self.lock_render();
        let held = match &self.lock_state().phase {
            Phase::Acquired { info, .. } => Some(info.clone()),
            _ => None,
        };
        if let Some(previous) = render.replace(Arc::clone(&target)) {
            previous.detach();
        }
        if let Some(info) = held {
            target.attach(&info);
        }
    }

    /// Requests a camera stream. Always prompts unless a stream is already
    /// held; concurrent calls share one acquisition.
    pub async fn request_permission(&self) -> Result<StreamInfo, CameraError> {
        let start = {
            let mut state = self.lock_state();
            match &state.phase {
                Phase::Acquired { info, .. } => Start::Held(info.clone()),
                Phase::Pending { outcome, .. } => Start::Join(outcome.clone()),
                Phase::Unacquired | Phase::Denied(_) => {
                    state.generation += 1;
                    let generation = state.generation;
                    let (publish, outcome) = watch::channel(None);
                    state.phase = Phase::Pending {
                        generation,
                        outcome,
                    };
                    self.emit(PermissionState::Pending);
                    Start::Fresh {
                        generation,
                        publish,
                    }
                }
            }
        };

        let (generation, publish) = match start {
            Start::Held(info) => return Ok(info),
            Start::Join(outcome) => {
                debug!("camera: joining in-flight acquisition");
                return join_pending(outcome).await;
            }
            Start::Fresh {
                generation,
                publish,
            } => (generation, publish),
        };

        info!(
            generation,
            facing = self.constraints.facing.label(),
            "camera: requesting stream"
        );
        let guard = PendingGuard {
            manager: self,
            generation,
            armed: true,
        };
        let result = self.device.request_stream(self.constraints).await;
        guard.disarm();

        let outcome = self.settle(generation, result);
        let _ = publish.send(Some(outcome.clone()));
        outcome
    }

    /// Enters streaming. A stored denial is returned as-is without prompting
    /// again; use [`Self::request_permission`] for an explicit retry.
    pub async fn activate(&self) -> Result<StreamInfo, CameraError> {
        let denied = match &self.lock_state().phase {
            Phase::Denied(err) => Some(err.clone()),
            _ => None,
        };
        if let Some(err) = denied {
            debug!("camera: activation refused, permission previously denied");
            return Err(err);
        }
        self.request_permission().await
    }

    /// Stops every track of the held stream and returns to `Unacquired`.
    /// Cancels an in-flight acquisition; its stream is stopped on arrival.
    pub fn deactivate(&self) {
        let render = self.lock_render();
        let released = {
            let mut state = self.lock_state();
            match std::mem::replace(&mut state.phase, Phase::Unacquired) {
                Phase::Acquired { stream, info } => {
                    self.emit(PermissionState::Unacquired);
                    Some((stream, info))
                }
                Phase::Pending { generation, .. } => {
                    info!(generation, "camera: pending acquisition cancelled");
                    self.emit(PermissionState::Unacquired);
                    None
                }
                Phase::Denied(err) => {
                    state.phase = Phase::Denied(err);
                    None
                }
                Phase::Unacquired => None,
            }
        };

        if let Some((stream, info)) = released {
            stream.stop_all_tracks();
            if let Some(target) = render.as_ref() {
                target.detach();
            }
            info!(stream = %info.stream_id, "camera: stream released");
        }
    }

    fn settle(
        &self,
        generation: u64,
        result: Result<Arc<dyn MediaStream>, CaptureFailure>,
    ) -> Result<StreamInfo, CameraError> {
        let render = self.lock_render();
        let mut state = self.lock_state();
        let current = matches!(
            state.phase,
            Phase::Pending { generation: pending, .. } if pending == generation
        );

        if !current {
            drop(state);
            drop(render);
            if let Ok(stream) = result {
                stream.stop_all_tracks();
                info!(
                    generation,
                    stream = %stream.id(),
                    "camera: late stream from cancelled acquisition stopped"
                );
            }
            return Err(CameraError::Cancelled);
        }

        match result {
            Ok(stream) => {
                let info = StreamInfo {
                    stream_id: stream.id(),
                    facing: stream.facing(),
                    live_tracks: stream.live_track_count(),
                    acquired_at: Utc::now(),
                };
                state.phase = Phase::Acquired {
                    stream,
                    info: info.clone(),
                };
                self.emit(PermissionState::Acquired(info.clone()));
                drop(state);

                if let Some(target) = render.as_ref() {
                    target.attach(&info);
                }
                info!(stream = %info.stream_id, tracks = info.live_tracks, "camera: stream acquired");
                Ok(info)
            }
            Err(failure) => {
                let err = classify_failure(failure);
                warn!(error = %err, "camera: acquisition failed");
                state.phase = Phase::Denied(err.clone());
                self.emit(PermissionState::Denied(err.clone()));
                Err(err)
            }
        }
    }

    fn abandon(&self, generation: u64) {
        let mut state = self.lock_state();
        if matches!(
            state.phase,
            Phase::Pending { generation: pending, .. } if pending == generation
        ) {
            state.phase = Phase::Unacquired;
            debug!(generation, "camera: acquisition dropped by caller");
            self.emit(PermissionState::Unacquired);
        }
    }

    fn emit(&self, state: PermissionState) {
        let _ = self.events.send(CameraEvent::PermissionChanged(state));
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_render(&self) -> MutexGuard<'_, Option<Arc<dyn VideoSink>>> {
        self.render_target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CameraSessionManager {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Phase::Acquired { stream, info } = std::mem::replace(&mut state.phase, Phase::Unacquired)
        {
            stream.stop_all_tracks();
            let render = self
                .render_target
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(target) = render.as_ref() {
                target.detach();
            }
            info!(stream = %info.stream_id, "camera: stream released on teardown");
        }
    }
}

/// Resets a `Pending` phase if the acquiring future is dropped before it settles.
struct PendingGuard<'a> {
    manager: &'a CameraSessionManager,
    generation: u64,
    armed: bool,
}

impl PendingGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.manager.abandon(self.generation);
        }
    }
}

async fn join_pending(mut outcome: watch::Receiver<Outcome>) -> Result<StreamInfo, CameraError> {
    match outcome.wait_for(Option::is_some).await {
        Ok(settled) => settled.clone().unwrap_or(Err(CameraError::Cancelled)),
        Err(_) => Err(CameraError::Cancelled),
    }
}

pub fn classify_failure(failure: CaptureFailure) -> CameraError {
    if failure.is_permission_refusal() {
        CameraError::PermissionDenied(failure.to_string())
    } else {
        CameraError::StreamAcquisitionFailed(failure.to_string())
    }
}

#[cfg(test)]
#[path = "tests/camera_tests.rs"]
mod tests;
