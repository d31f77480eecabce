//! Image quality analysis.
//!
//! Computes descriptive statistics of an image (brightness, contrast,
//! sharpness, text-pixel density), derives a bounded quality score from
//! four empirically chosen acceptance bands, and produces human-readable
//! improvement hints. The orchestrator optionally uses the score to
//! pre-select a preprocessing strategy; the record itself is diagnostic
//! and never part of the durable extraction output.

use image::DynamicImage;
use imageproc::contrast::otsu_level;
use imageproc::filter::laplacian_filter;
use serde::Serialize;

use crate::core::constants::{BRIGHTNESS_BAND, MIN_CONTRAST, MIN_SHARPNESS, TEXT_DENSITY_BAND};
use crate::core::errors::{OcrError, OcrResult};
use crate::processors::transforms::to_grayscale;

/// Diagnostic statistics and quality assessment for one image or crop.
#[derive(Debug, Clone, Serialize)]
pub struct QualityAnalysis {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Channel count of the source buffer (1 for grayscale, 3 for RGB).
    pub channels: u8,
    /// Arithmetic mean of luminance, 0-255.
    pub mean_brightness: f64,
    /// Population standard deviation of luminance; doubles as contrast.
    pub std_brightness: f64,
    /// Variance of the Laplacian response; higher means more edge energy.
    pub sharpness: f64,
    /// Fraction of pixels on the ink side of the Otsu threshold.
    pub text_density: f64,
    /// Sum of four independent 0.25 band contributions, in `[0, 1]`.
    pub quality_score: f64,
    /// One fixed advisory string per violated band, in band order.
    pub recommendations: Vec<String>,
}

/// Analyzes an image and derives its quality score.
///
/// The input is never mutated. Luminance conversion uses the same mapping
/// as every preprocessing strategy, so scores are comparable across the
/// pipeline.
///
/// # Errors
///
/// Returns `OcrError::InvalidImage` for an empty pixel buffer.
pub fn analyze(image: &DynamicImage) -> OcrResult<QualityAnalysis> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(OcrError::invalid_image(format!(
            "cannot analyze empty {width}x{height} buffer"
        )));
    }

    let gray = to_grayscale(image);
    let total = f64::from(width) * f64::from(height);

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for p in gray.pixels() {
        let v = f64::from(p[0]);
        sum += v;
        sum_sq += v * v;
    }
    let mean_brightness = sum / total;
    let variance = (sum_sq / total - mean_brightness * mean_brightness).max(0.0);
    let std_brightness = variance.sqrt();

    let sharpness = laplacian_variance(&gray);

    let level = otsu_level(&gray);
    let ink_pixels = gray.pixels().filter(|p| p[0] <= level).count();
    let text_density = ink_pixels as f64 / total;

    let mut quality_score = 0.0;
    if (BRIGHTNESS_BAND.0..=BRIGHTNESS_BAND.1).contains(&mean_brightness) {
        quality_score += 0.25;
    }
    if std_brightness > MIN_CONTRAST {
        quality_score += 0.25;
    }
    if sharpness > MIN_SHARPNESS {
        quality_score += 0.25;
    }
    if (TEXT_DENSITY_BAND.0..=TEXT_DENSITY_BAND.1).contains(&text_density) {
        quality_score += 0.25;
    }

    let mut recommendations = Vec::new();
    if mean_brightness < BRIGHTNESS_BAND.0 {
        recommendations.push("Increase brightness".to_string());
    }
    if mean_brightness > BRIGHTNESS_BAND.1 {
        recommendations.push("Decrease brightness".to_string());
    }
    if std_brightness <= MIN_CONTRAST {
        recommendations.push("Increase contrast".to_string());
    }
    if sharpness <= MIN_SHARPNESS {
        recommendations.push("Apply sharpening".to_string());
    }
    if text_density < TEXT_DENSITY_BAND.0 {
        recommendations.push("Image might be too light or blurry".to_string());
    }
    if text_density > TEXT_DENSITY_BAND.1 {
        recommendations.push("Image might be too dark".to_string());
    }

    Ok(QualityAnalysis {
        width,
        height,
        channels: image.color().channel_count(),
        mean_brightness,
        std_brightness,
        sharpness,
        text_density,
        quality_score,
        recommendations,
    })
}

/// Population variance of the image's Laplacian response.
fn laplacian_variance(gray: &image::GrayImage) -> f64 {
    let response = laplacian_filter(gray);
    let total = response.pixels().len() as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for p in response.pixels() {
        let v = f64::from(p[0]);
        sum += v;
        sum_sq += v * v;
    }
    let mean = sum / total;
    (sum_sq / total - mean * mean).max(0.0)
}
