//! Core error handling, configuration, and shared constants.

pub mod config;
pub mod constants;
pub mod errors;

pub use config::EngineConfig;
pub use errors::{OcrError, OcrResult};
