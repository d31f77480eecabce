//! The fixed, ordered set of preprocessing strategies.
//!
//! Order matters: it is the tie-break order during the sweep and
//! determines which strategy the early exit locks onto, so [`Strategy::ALL`]
//! must never be reordered.

use std::str::FromStr;

use image::DynamicImage;

use crate::core::errors::{OcrError, OcrResult};
use crate::processors::transforms;

/// One deterministic preprocessing transform (or pipeline of transforms)
/// tried before recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Identity; the crop is recognized as-is.
    Original,
    /// Luminance-only conversion.
    Grayscale,
    /// Grayscale plus global Otsu binarization.
    Threshold,
    /// Grayscale plus Gaussian-weighted locally adaptive binarization.
    AdaptiveThreshold,
    /// Grayscale plus 3x3 median noise suppression.
    Denoise,
    /// Grayscale plus localized histogram equalization.
    ContrastEnhancement,
    /// Grayscale plus unsharp-mask style convolution.
    Sharpen,
    /// Grayscale plus 2x2 morphological closing.
    Morphology,
    /// Grayscale, contrast enhancement, denoise, sharpen, then Otsu,
    /// applied in that fixed sequence.
    Combined,
}

impl Strategy {
    /// All strategies in sweep order.
    pub const ALL: [Strategy; 9] = [
        Strategy::Original,
        Strategy::Grayscale,
        Strategy::Threshold,
        Strategy::AdaptiveThreshold,
        Strategy::Denoise,
        Strategy::ContrastEnhancement,
        Strategy::Sharpen,
        Strategy::Morphology,
        Strategy::Combined,
    ];

    /// The strategy's stable name, used in results and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Original => "original",
            Strategy::Grayscale => "grayscale",
            Strategy::Threshold => "threshold",
            Strategy::AdaptiveThreshold => "adaptive_threshold",
            Strategy::Denoise => "denoise",
            Strategy::ContrastEnhancement => "contrast_enhancement",
            Strategy::Sharpen => "sharpen",
            Strategy::Morphology => "morphology",
            Strategy::Combined => "combined",
        }
    }

    /// Applies the strategy's transform to an independent copy of the
    /// input. The input is never mutated.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::Transform` if the transform cannot execute;
    /// the strategy engine logs and skips to the next strategy.
    pub fn apply(&self, image: &DynamicImage) -> OcrResult<DynamicImage> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::transform(self.name(), "zero-sized input"));
        }
        if matches!(self, Strategy::Original) {
            return Ok(image.clone());
        }
        let gray = transforms::to_grayscale(image);
        let out = match self {
            Strategy::Original => unreachable!("handled above"),
            Strategy::Grayscale => gray,
            Strategy::Threshold => transforms::otsu_binarize(&gray),
            Strategy::AdaptiveThreshold => transforms::adaptive_binarize(&gray),
            Strategy::Denoise => transforms::median_denoise(&gray),
            Strategy::ContrastEnhancement => transforms::enhance_contrast(&gray),
            Strategy::Sharpen => transforms::sharpen(&gray),
            Strategy::Morphology => transforms::morphological_close(&gray),
            Strategy::Combined => transforms::combined(&gray),
        };
        Ok(DynamicImage::ImageLuma8(out))
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = OcrError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| OcrError::config(format!("unknown strategy '{name}'")))
    }
}
