//! UI/backend events and error modeling for the guide window.

use guide_core::{PermissionState, ViewSnapshot};
use media_capture::StreamInfo;
use shared::error::{ErrorCode, GuideError};

pub enum UiEvent {
    Info(String),
    Snapshot(Box<ViewSnapshot>),
    PermissionChanged(PermissionState),
    FeedAttached(StreamInfo),
    FeedDetached,
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Permission,
    Hardware,
    Validation,
    Unknown,
}

impl UiErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Permission => "Camera permission",
            Self::Hardware => "Camera unavailable",
            Self::Validation => "Not allowed here",
            Self::Unknown => "Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Navigation,
    StartAr,
    RetryPermission,
    Overlay,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_guide_error(context: UiErrorContext, err: GuideError) -> Self {
        let category = match err.code {
            ErrorCode::PermissionDenied => UiErrorCategory::Permission,
            ErrorCode::StreamAcquisitionFailed => UiErrorCategory::Hardware,
            ErrorCode::InvalidHotspotReference
            | ErrorCode::UnknownRecord
            | ErrorCode::Validation => UiErrorCategory::Validation,
            ErrorCode::Cancelled => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.message,
        }
    }

    /// Classifies free-form failures that never went through [`GuideError`].
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("permission")
            || message_lower.contains("denied")
            || message_lower.contains("not allowed")
        {
            UiErrorCategory::Permission
        } else if message_lower.contains("camera")
            || message_lower.contains("device")
            || message_lower.contains("not readable")
            || message_lower.contains("acquisition")
        {
            UiErrorCategory::Hardware
        } else if message_lower.contains("invalid")
            || message_lower.contains("unknown")
            || message_lower.contains("cannot")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Camera failures get a retry affordance; everything else is informational.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category,
            UiErrorCategory::Permission | UiErrorCategory::Hardware
        )
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use shared::error::CameraError;

    use super::*;

    #[test]
    fn guide_error_codes_map_to_categories() {
        let denied = UiError::from_guide_error(
            UiErrorContext::StartAr,
            CameraError::PermissionDenied("Permission denied by user".into()).into(),
        );
        assert_eq!(denied.category(), UiErrorCategory::Permission);
        assert!(denied.is_retryable());
        assert!(denied.message().contains("Permission denied by user"));

        let failed = UiError::from_guide_error(
            UiErrorContext::RetryPermission,
            CameraError::StreamAcquisitionFailed("Could not start video source".into()).into(),
        );
        assert_eq!(failed.category(), UiErrorCategory::Hardware);
        assert_eq!(failed.context(), UiErrorContext::RetryPermission);

        let invalid = UiError::from_guide_error(
            UiErrorContext::Navigation,
            GuideError::new(ErrorCode::UnknownRecord, "unknown spring record x"),
        );
        assert_eq!(invalid.category(), UiErrorCategory::Validation);
        assert!(!invalid.is_retryable());
    }

    #[test]
    fn free_form_messages_are_classified() {
        let cases = [
            ("camera permission denied", UiErrorCategory::Permission),
            ("Could not start video source: device busy", UiErrorCategory::Hardware),
            ("cannot exit AR from the catalog view", UiErrorCategory::Validation),
            ("backend worker startup failure", UiErrorCategory::Unknown),
        ];
        for (message, expected) in cases {
            let err = UiError::from_message(UiErrorContext::BackendStartup, message);
            assert_eq!(err.category(), expected, "{message}");
        }
    }
}
