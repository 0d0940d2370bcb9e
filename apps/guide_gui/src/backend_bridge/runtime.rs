//! Backend worker: owns the view controller on a tokio runtime, applies UI
//! commands and reports snapshots back to the UI thread.

use std::{sync::Arc, thread};

use catalog::Catalog;
use crossbeam_channel::{unbounded, Receiver, Sender};
use guide_core::{
    build_controller, CameraEvent, CameraTicket, GuideSettings, ViewController, ViewError,
};
use media_capture::{CaptureConstraints, MediaCaptureDevice, SimulatedCamera, StreamInfo};
use shared::error::{CameraError, GuideError};
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};

use crate::backend_bridge::{commands::BackendCommand, feed::UiFeedSink};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub struct BackendConfig {
    pub catalog: Arc<Catalog>,
    pub settings: GuideSettings,
}

/// Camera work finished on a runtime task, fed back into the command loop
/// with the ticket the controller issued when it started.
#[derive(Debug)]
enum Completion {
    Activation {
        ticket: CameraTicket,
        result: Result<StreamInfo, CameraError>,
    },
    Retry {
        ticket: CameraTicket,
        result: Result<StreamInfo, CameraError>,
    },
}

enum Inbound {
    Command(BackendCommand),
    Completion(Completion),
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, config: BackendConfig) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(run(cmd_rx, ui_tx, config));
    });
}

async fn run(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, config: BackendConfig) {
    let (done_tx, done_rx) = unbounded::<Completion>();
    let mut worker = Worker::new(config, ui_tx.clone(), done_tx);
    let event_task = worker.forward_camera_events();
    worker.publish();
    let _ = ui_tx.try_send(UiEvent::Info("Ready".to_string()));

    loop {
        let inbound = crossbeam_channel::select! {
            recv(cmd_rx) -> msg => msg.ok().map(Inbound::Command),
            recv(done_rx) -> msg => msg.ok().map(Inbound::Completion),
        };
        match inbound {
            Some(Inbound::Command(cmd)) => worker.handle_command(cmd),
            Some(Inbound::Completion(done)) => worker.handle_completion(done),
            None => break,
        }
        worker.publish();
    }

    tracing::info!("backend: ui command queue closed, releasing camera");
    worker.shutdown();
    event_task.abort();
}

struct Worker {
    controller: ViewController,
    done_tx: Sender<Completion>,
    ui_tx: Sender<UiEvent>,
}

impl Worker {
    fn new(config: BackendConfig, ui_tx: Sender<UiEvent>, done_tx: Sender<Completion>) -> Self {
        let settings = config.settings;
        let device = Arc::new(SimulatedCamera::with_latency(
            settings.camera_policy,
            settings.camera_latency(),
        ));
        Self::with_device(
            config.catalog,
            device,
            CaptureConstraints::video(settings.camera_facing),
            ui_tx,
            done_tx,
        )
    }

    fn with_device(
        catalog: Arc<Catalog>,
        device: Arc<dyn MediaCaptureDevice>,
        constraints: CaptureConstraints,
        ui_tx: Sender<UiEvent>,
        done_tx: Sender<Completion>,
    ) -> Self {
        let controller = build_controller(catalog, device, constraints);
        controller
            .camera()
            .bind_render_target(Arc::new(UiFeedSink::new(ui_tx.clone())));
        Self {
            controller,
            done_tx,
            ui_tx,
        }
    }

    fn forward_camera_events(&self) -> JoinHandle<()> {
        let mut events = self.controller.camera().subscribe_events();
        let ui_tx = self.ui_tx.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(CameraEvent::PermissionChanged(state)) => {
                        let _ = ui_tx.try_send(UiEvent::PermissionChanged(state));
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "backend: camera events lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn handle_command(&mut self, cmd: BackendCommand) {
        tracing::info!(command = cmd.name(), "backend: command");
        let (context, result) = match cmd {
            BackendCommand::SelectRecord { id } => (
                UiErrorContext::Navigation,
                self.controller.select_record(&id),
            ),
            BackendCommand::BackToCatalog => {
                (UiErrorContext::Navigation, self.controller.back_to_catalog())
            }
            BackendCommand::StartAr => (UiErrorContext::StartAr, self.start_ar()),
            BackendCommand::RetryPermission => {
                (UiErrorContext::RetryPermission, self.retry_permission())
            }
            BackendCommand::ExitAr => (UiErrorContext::Navigation, self.controller.exit_ar()),
            BackendCommand::SelectHotspot { id } => {
                self.controller.select_hotspot(&id);
                (UiErrorContext::Overlay, Ok(()))
            }
            BackendCommand::ResetView => {
                self.controller.reset_view();
                (UiErrorContext::Overlay, Ok(()))
            }
            BackendCommand::ToggleInfoPanel => {
                self.controller.toggle_info_panel();
                (UiErrorContext::Overlay, Ok(()))
            }
            BackendCommand::ToggleAudio => {
                self.controller.toggle_audio();
                (UiErrorContext::Overlay, Ok(()))
            }
        };
        if let Err(err) = result {
            self.report(context, err);
        }
    }

    fn start_ar(&mut self) -> Result<(), ViewError> {
        let Some(ticket) = self.controller.begin_start_ar()? else {
            return Ok(());
        };
        let camera = Arc::clone(self.controller.camera());
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let result = camera.activate().await;
            let _ = done_tx.send(Completion::Activation { ticket, result });
        });
        Ok(())
    }

    fn retry_permission(&mut self) -> Result<(), ViewError> {
        let ticket = self.controller.begin_retry_permission()?;
        let camera = Arc::clone(self.controller.camera());
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let result = camera.request_permission().await;
            let _ = done_tx.send(Completion::Retry { ticket, result });
        });
        Ok(())
    }

    fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Activation { ticket, result } => {
                if let Err(err) = self.controller.finish_start_ar(ticket, result) {
                    self.report(UiErrorContext::StartAr, err);
                }
            }
            Completion::Retry { ticket, result } => {
                match self.controller.finish_retry_permission(ticket, result) {
                    Ok(stream) => {
                        tracing::info!(stream = %stream.stream_id, "backend: camera access restored");
                        let _ = self
                            .ui_tx
                            .try_send(UiEvent::Info("Camera access granted".to_string()));
                    }
                    Err(err) => self.report(UiErrorContext::RetryPermission, err),
                }
            }
        }
    }

    fn publish(&self) {
        let snapshot = self.controller.snapshot();
        if self
            .ui_tx
            .try_send(UiEvent::Snapshot(Box::new(snapshot)))
            .is_err()
        {
            tracing::warn!("backend: ui queue unavailable, snapshot dropped");
        }
    }

    fn report(&self, context: UiErrorContext, err: ViewError) {
        if matches!(err, ViewError::Camera(CameraError::Cancelled)) {
            tracing::debug!(?context, "backend: camera request cancelled");
            return;
        }
        tracing::warn!(?context, "backend: {err}");
        let err = GuideError::from(err);
        // Only camera failures reach the banner; navigation misuse is just logged.
        if err.is_retryable() {
            let _ = self
                .ui_tx
                .try_send(UiEvent::Error(UiError::from_guide_error(context, err)));
        }
    }

    fn shutdown(&mut self) {
        self.controller.teardown();
    }
}
