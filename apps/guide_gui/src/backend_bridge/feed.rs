//! Render target that forwards feed attach/detach to the UI thread.

use crossbeam_channel::Sender;
use media_capture::{StreamInfo, VideoSink};

use crate::controller::events::UiEvent;

pub struct UiFeedSink {
    ui_tx: Sender<UiEvent>,
}

impl UiFeedSink {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }
}

impl VideoSink for UiFeedSink {
    // Called with the camera state locked, so never block here.
    fn attach(&self, stream: &StreamInfo) {
        if self
            .ui_tx
            .try_send(UiEvent::FeedAttached(stream.clone()))
            .is_err()
        {
            tracing::warn!(stream = %stream.stream_id, "feed: ui queue unavailable on attach");
        }
    }

    fn detach(&self) {
        if self.ui_tx.try_send(UiEvent::FeedDetached).is_err() {
            tracing::warn!("feed: ui queue unavailable on detach");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crossbeam_channel::bounded;
    use media_capture::FacingMode;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn forwards_attach_and_detach() {
        let (ui_tx, ui_rx) = bounded(4);
        let sink = UiFeedSink::new(ui_tx);
        let info = StreamInfo {
            stream_id: Uuid::new_v4(),
            facing: FacingMode::Environment,
            live_tracks: 1,
            acquired_at: Utc::now(),
        };

        sink.attach(&info);
        sink.detach();

        assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::FeedAttached(got)) if got == info));
        assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::FeedDetached)));
    }

    #[test]
    fn full_queue_does_not_block() {
        let (ui_tx, _ui_rx) = bounded(1);
        let sink = UiFeedSink::new(ui_tx);
        sink.detach();
        sink.detach();
    }
}
