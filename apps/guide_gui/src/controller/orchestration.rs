//! Hands guide actions (taps on cards, AR controls) to the camera worker.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();
    let action = action_label(&cmd);

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "guide: action queued"),
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "guide: action dropped, worker busy");
            *status = format!("Still busy with the camera; tap again to {action}");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "guide: camera worker gone");
            *status = "The AR camera worker has stopped; restart the guide to explore again"
                .to_string();
        }
    }
}

fn action_label(cmd: &BackendCommand) -> &'static str {
    match cmd {
        BackendCommand::SelectRecord { .. } => "open the spring",
        BackendCommand::BackToCatalog => "go back",
        BackendCommand::StartAr => "start AR",
        BackendCommand::RetryPermission => "retry the camera",
        BackendCommand::ExitAr => "leave AR",
        BackendCommand::SelectHotspot { .. } => "pick the hotspot",
        BackendCommand::ResetView
        | BackendCommand::ToggleInfoPanel
        | BackendCommand::ToggleAudio => "update the view",
    }
}
