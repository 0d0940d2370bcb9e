//! In-process camera used by the desktop app, the CLI walkthrough and tests.

use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{CaptureConstraints, CaptureFailure, FacingMode, MediaCaptureDevice, MediaStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraPolicy {
    #[default]
    Grant,
    Deny,
    Fail,
}

impl FromStr for CameraPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grant" | "allow" => Ok(Self::Grant),
            "deny" => Ok(Self::Deny),
            "fail" | "error" => Ok(Self::Fail),
            other => Err(format!("unknown camera policy '{other}'")),
        }
    }
}

pub struct SimulatedStream {
    id: Uuid,
    facing: FacingMode,
    live_tracks: AtomicUsize,
}

impl SimulatedStream {
    fn new(constraints: CaptureConstraints) -> Self {
        let tracks = if constraints.audio { 2 } else { 1 };
        Self {
            id: Uuid::new_v4(),
            facing: constraints.facing,
            live_tracks: AtomicUsize::new(tracks),
        }
    }
}

impl MediaStream for SimulatedStream {
    fn id(&self) -> Uuid {
        self.id
    }

    fn facing(&self) -> FacingMode {
        self.facing
    }

    fn live_track_count(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }

    fn stop_all_tracks(&self) {
        let stopped = self.live_tracks.swap(0, Ordering::SeqCst);
        if stopped > 0 {
            debug!(stream = %self.id, tracks = stopped, "simulated camera: tracks stopped");
        }
    }
}

pub struct SimulatedCamera {
    policy: Mutex<CameraPolicy>,
    latency: Duration,
    requests: AtomicUsize,
    streams: Mutex<Vec<Arc<SimulatedStream>>>,
}

impl SimulatedCamera {
    pub fn new(policy: CameraPolicy) -> Self {
        Self::with_latency(policy, Duration::ZERO)
    }

    pub fn with_latency(policy: CameraPolicy, latency: Duration) -> Self {
        Self {
            policy: Mutex::new(policy),
            latency,
            requests: AtomicUsize::new(0),
            streams: Mutex::new(Vec::new()),
        }
    }

    pub fn policy(&self) -> CameraPolicy {
        *self.policy.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes how later requests are answered, e.g. after the user fixes site settings.
    pub fn set_policy(&self, policy: CameraPolicy) {
        *self.policy.lock().unwrap_or_else(PoisonError::into_inner) = policy;
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn streams_issued(&self) -> usize {
        self.streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Tracks still running across every stream this camera has handed out.
    pub fn live_tracks(&self) -> usize {
        self.streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|stream| stream.live_track_count())
            .sum()
    }
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new(CameraPolicy::Grant)
    }
}

#[async_trait]
impl MediaCaptureDevice for SimulatedCamera {
    async fn request_stream(
        &self,
        constraints: CaptureConstraints,
    ) -> Result<Arc<dyn MediaStream>, CaptureFailure> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.policy() {
            CameraPolicy::Grant => {
                let stream = Arc::new(SimulatedStream::new(constraints));
                info!(
                    stream = %stream.id,
                    facing = constraints.facing.label(),
                    "simulated camera: stream granted"
                );
                self.streams
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(Arc::clone(&stream));
                Ok(stream)
            }
            CameraPolicy::Deny => Err(CaptureFailure::NotAllowed(
                "Permission denied by user".to_string(),
            )),
            CameraPolicy::Fail => Err(CaptureFailure::NotReadable(
                "Could not start video source".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn grants_a_live_environment_stream() {
        let camera = SimulatedCamera::new(CameraPolicy::Grant);
        let stream = camera
            .request_stream(CaptureConstraints::video(FacingMode::Environment))
            .await
            .expect("granted");

        assert_eq!(stream.facing(), FacingMode::Environment);
        assert_eq!(stream.live_track_count(), 1);
        assert_eq!(camera.live_tracks(), 1);

        stream.stop_all_tracks();
        stream.stop_all_tracks();
        assert_eq!(camera.live_tracks(), 0);
        assert_eq!(camera.streams_issued(), 1);
    }

    #[tokio::test]
    async fn deny_and_fail_map_to_distinct_failures() {
        let camera = SimulatedCamera::new(CameraPolicy::Deny);
        let denied = camera
            .request_stream(CaptureConstraints::default())
            .await
            .err()
            .expect("denied");
        assert!(denied.is_permission_refusal());

        camera.set_policy(CameraPolicy::Fail);
        let failed = camera
            .request_stream(CaptureConstraints::default())
            .await
            .err()
            .expect("failed");
        assert!(!failed.is_permission_refusal());
        assert_eq!(camera.request_count(), 2);
        assert_eq!(camera.streams_issued(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_the_answer() {
        let camera = SimulatedCamera::with_latency(CameraPolicy::Grant, Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        camera
            .request_stream(CaptureConstraints::default())
            .await
            .expect("granted");
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[test]
    fn parses_policies_from_config_strings() {
        assert_eq!("Grant".parse::<CameraPolicy>(), Ok(CameraPolicy::Grant));
        assert_eq!(" deny ".parse::<CameraPolicy>(), Ok(CameraPolicy::Deny));
        assert_eq!("error".parse::<CameraPolicy>(), Ok(CameraPolicy::Fail));
        assert!("maybe".parse::<CameraPolicy>().is_err());
    }
}
