//! Data model and error taxonomy shared by the spring guide crates.

pub mod domain;
pub mod error;
