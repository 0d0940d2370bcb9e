//! Bridge between the egui thread and the tokio worker that owns the view controller.

pub mod commands;
pub mod feed;
pub mod runtime;
