//! Text recognition backends.
//!
//! The strategy engine consumes recognition as a black box through the
//! [`TextRecognizer`] trait: a pixel buffer goes in, tokens with
//! per-token engine confidences (0-100 scale) come out. The production
//! backend is [`TesseractRecognizer`]; tests substitute scripted stubs.

pub mod tesseract;

use image::DynamicImage;

use crate::core::errors::OcrResult;

pub use tesseract::TesseractRecognizer;

/// One recognized text token with the engine's native confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedToken {
    /// The recognized text fragment.
    pub text: String,
    /// Engine-reported confidence on the native 0-100 scale. Values at
    /// or below zero mark non-detections and are discarded by the scorer.
    pub confidence: f32,
}

impl RecognizedToken {
    /// Creates a token.
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// A text recognition engine.
///
/// Implementations must be deterministic for a fixed input image and must
/// not mutate the input. `Send + Sync` is required so fields can be
/// processed concurrently and sweeps can run on timeout helper threads.
pub trait TextRecognizer: Send + Sync {
    /// Recognizes text in the given image.
    ///
    /// # Returns
    ///
    /// * `Ok(tokens)` - Possibly empty; an empty list is a normal outcome.
    /// * `Err(OcrError::Recognition)` - The engine itself failed. Inside
    ///   the strategy loop this is treated like an empty attempt.
    fn recognize(&self, image: &DynamicImage) -> OcrResult<Vec<RecognizedToken>>;
}
