//! Pixel-level transforms and image quality analysis.
//!
//! The transforms here are the building blocks the preprocessing
//! strategies are assembled from; the quality module rates how
//! OCR-friendly an image is before any strategy runs.

pub mod clahe;
pub mod quality;
pub mod transforms;

pub use quality::{analyze, QualityAnalysis};
