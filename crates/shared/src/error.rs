use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{HotspotId, SpringId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    PermissionDenied,
    StreamAcquisitionFailed,
    Cancelled,
    InvalidHotspotReference,
    UnknownRecord,
    Validation,
}

/// Flattened error carried across the UI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideError {
    pub code: ErrorCode,
    pub message: String,
}

impl GuideError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether the user can act on this error with a retry affordance.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::PermissionDenied | ErrorCode::StreamAcquisitionFailed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),
    #[error("camera stream acquisition failed: {0}")]
    StreamAcquisitionFailed(String),
    #[error("camera acquisition cancelled before it completed")]
    Cancelled,
}

impl CameraError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::PermissionDenied(_) => ErrorCode::PermissionDenied,
            Self::StreamAcquisitionFailed(_) => ErrorCode::StreamAcquisitionFailed,
            Self::Cancelled => ErrorCode::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("hotspot {hotspot} does not belong to record {record}")]
    InvalidHotspotReference { record: SpringId, hotspot: HotspotId },
    #[error("no record is selected")]
    NoRecordSelected,
}

impl OverlayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidHotspotReference { .. } => ErrorCode::InvalidHotspotReference,
            Self::NoRecordSelected => ErrorCode::Validation,
        }
    }
}

impl From<CameraError> for GuideError {
    fn from(value: CameraError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}

impl From<OverlayError> for GuideError {
    fn from(value: OverlayError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_failures_are_retryable_but_cancellation_is_not() {
        let denied: GuideError = CameraError::PermissionDenied("user dismissed".into()).into();
        assert_eq!(denied.code, ErrorCode::PermissionDenied);
        assert!(denied.is_retryable());

        let failed: GuideError = CameraError::StreamAcquisitionFailed("busy".into()).into();
        assert!(failed.is_retryable());

        let cancelled: GuideError = CameraError::Cancelled.into();
        assert!(!cancelled.is_retryable());
    }

    #[test]
    fn invalid_hotspot_message_names_both_ids() {
        let err = OverlayError::InvalidHotspotReference {
            record: SpringId::new("baotu"),
            hotspot: HotspotId::new("tiger-heads"),
        };
        assert_eq!(
            err.to_string(),
            "hotspot tiger-heads does not belong to record baotu"
        );
        assert_eq!(err.code(), ErrorCode::InvalidHotspotReference);
    }
}
