//! Stateless pixel-level transforms used by the preprocessing strategies.
//!
//! Every function here is pure and deterministic: it takes an image by
//! reference and returns a new buffer, never mutating its input. The
//! grayscale conversion is the single luminance mapping used everywhere in
//! the crate so strategy comparisons stay consistent.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::{filter3x3, gaussian_blur_f32, median_filter};

use crate::processors::clahe::clahe;

/// Gaussian sigma for the adaptive threshold's weighted neighborhood,
/// matching an 11-pixel block (0.3 * ((11 - 1) * 0.5 - 1) + 0.8).
const ADAPTIVE_SIGMA: f32 = 2.0;

/// Constant subtracted from the local weighted mean before comparison.
const ADAPTIVE_OFFSET: i16 = 2;

/// Unsharp-mask style 3x3 kernel: center weight 9, eight neighbors -1.
const SHARPEN_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0];

/// CLAHE tile grid used by contrast enhancement.
const CLAHE_GRID: (u32, u32) = (8, 8);

/// CLAHE clip limit used by contrast enhancement.
const CLAHE_CLIP_LIMIT: f32 = 2.0;

/// Converts any image to 8-bit luminance.
///
/// This is the one grayscale mapping shared by the quality analyzer and
/// every preprocessing strategy.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Binarizes with a global threshold chosen to maximize between-class
/// variance (Otsu).
pub fn otsu_binarize(image: &GrayImage) -> GrayImage {
    let level = otsu_level(image);
    threshold(image, level, ThresholdType::Binary)
}

/// Binarizes with a per-pixel threshold taken from a Gaussian-weighted
/// local neighborhood (block size 11, constant offset 2).
pub fn adaptive_binarize(image: &GrayImage) -> GrayImage {
    let local_mean = gaussian_blur_f32(image, ADAPTIVE_SIGMA);
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let p = i16::from(image.get_pixel(x, y)[0]);
        let m = i16::from(local_mean.get_pixel(x, y)[0]);
        if p > m - ADAPTIVE_OFFSET {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Median-filter noise suppression with a 3x3 kernel.
pub fn median_denoise(image: &GrayImage) -> GrayImage {
    median_filter(image, 1, 1)
}

/// Localized histogram equalization (CLAHE, tile grid 8x8, clip limit 2.0).
pub fn enhance_contrast(image: &GrayImage) -> GrayImage {
    clahe(image, CLAHE_GRID, CLAHE_CLIP_LIMIT)
}

/// Unsharp-mask style sharpening convolution.
pub fn sharpen(image: &GrayImage) -> GrayImage {
    filter3x3(image, &SHARPEN_KERNEL)
}

/// Morphological closing with a 2x2 structuring element, bridging small
/// gaps in character strokes.
pub fn morphological_close(image: &GrayImage) -> GrayImage {
    erode_2x2(&dilate_2x2(image))
}

/// The multi-step combined pipeline: contrast enhancement, denoise,
/// sharpen, then global Otsu binarization, in that fixed order.
pub fn combined(image: &GrayImage) -> GrayImage {
    let enhanced = enhance_contrast(image);
    let denoised = median_denoise(&enhanced);
    let sharpened = sharpen(&denoised);
    otsu_binarize(&sharpened)
}

/// Dilation over the 2x2 window anchored at the pixel (right/lower
/// neighbors, borders clamped).
fn dilate_2x2(image: &GrayImage) -> GrayImage {
    let (w, h) = image.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let x1 = (x + 1).min(w - 1);
        let y1 = (y + 1).min(h - 1);
        let v = image.get_pixel(x, y)[0]
            .max(image.get_pixel(x1, y)[0])
            .max(image.get_pixel(x, y1)[0])
            .max(image.get_pixel(x1, y1)[0]);
        Luma([v])
    })
}

/// Erosion over the reflected 2x2 window (left/upper neighbors), the
/// adjoint of [`dilate_2x2`] so their composition is a true closing.
fn erode_2x2(image: &GrayImage) -> GrayImage {
    let (w, h) = image.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let x0 = x.saturating_sub(1);
        let y0 = y.saturating_sub(1);
        let v = image.get_pixel(x, y)[0]
            .min(image.get_pixel(x0, y)[0])
            .min(image.get_pixel(x, y0)[0])
            .min(image.get_pixel(x0, y0)[0]);
        Luma([v])
    })
}
