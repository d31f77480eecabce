//! Image loading and cropping helpers.

use std::path::Path;

use image::DynamicImage;

use crate::core::errors::{OcrError, OcrResult};
use crate::domain::template::FieldRect;

/// Loads an image from a file path.
///
/// # Errors
///
/// Returns `OcrError::ImageLoad` if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> OcrResult<DynamicImage> {
    image::open(path).map_err(OcrError::ImageLoad)
}

/// Crops a field rectangle out of a source image as an independent copy.
///
/// # Errors
///
/// Returns `OcrError::InvalidImage` if the rectangle does not fit the
/// image; callers that already validated bounds will not hit this.
pub fn crop_field(image: &DynamicImage, rect: &FieldRect) -> OcrResult<DynamicImage> {
    rect.check_within(image.width(), image.height())
        .map_err(OcrError::invalid_image)?;
    Ok(image.crop_imm(rect.x, rect.y, rect.w, rect.h))
}
