//! Error types for the extraction pipeline.
//!
//! This module defines the error taxonomy used throughout the crate and
//! helper constructors for creating errors with appropriate context.
//! Failures are contained at the smallest scope possible: a failed
//! preprocessing strategy skips to the next strategy, a failed field is
//! recorded as a failed [`ExtractionResult`](crate::domain::ExtractionResult)
//! and never aborts its siblings.

use thiserror::Error;

/// Errors that can occur while extracting text from image regions.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The pixel buffer is empty, malformed, or outside the configured
    /// size limits. Fatal for the operation on that single image or crop,
    /// never for the whole batch.
    #[error("invalid image: {message}")]
    InvalidImage {
        /// A message describing why the image was rejected.
        message: String,
    },

    /// A field rectangle lies outside the source image or has
    /// non-positive dimensions. Recorded per field, the batch continues.
    #[error("invalid field bounds for '{field}': {message}")]
    InvalidFieldBounds {
        /// The name of the offending field.
        field: String,
        /// A message describing the violated bound.
        message: String,
    },

    /// A single preprocessing strategy could not execute. Non-fatal; the
    /// strategy engine skips to the next strategy in order.
    #[error("transform '{strategy}' failed: {message}")]
    Transform {
        /// The name of the strategy that failed.
        strategy: &'static str,
        /// A message describing the failure.
        message: String,
    },

    /// The text recognition backend failed. Within the strategy loop this
    /// is treated like an empty attempt; at construction time it is fatal
    /// since no strategy could possibly succeed.
    #[error("recognition failed: {message}")]
    Recognition {
        /// A message describing the failure.
        message: String,
    },

    /// A field's strategy sweep exceeded the configured bound. Recorded
    /// per field, the batch continues.
    #[error("field '{field}' timed out after {timeout_ms} ms")]
    Timeout {
        /// The name of the field that timed out.
        field: String,
        /// The configured bound in milliseconds.
        timeout_ms: u64,
    },

    /// Error occurred while decoding an image file.
    #[error("image load")]
    ImageLoad(#[from] image::ImageError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },
}

impl OcrError {
    /// Creates an [`OcrError::InvalidImage`].
    pub fn invalid_image(message: impl Into<String>) -> Self {
        Self::InvalidImage {
            message: message.into(),
        }
    }

    /// Creates an [`OcrError::InvalidFieldBounds`] for the named field.
    pub fn invalid_field_bounds(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFieldBounds {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an [`OcrError::Transform`] for the named strategy.
    pub fn transform(strategy: &'static str, message: impl Into<String>) -> Self {
        Self::Transform {
            strategy,
            message: message.into(),
        }
    }

    /// Creates an [`OcrError::Recognition`] from any displayable cause.
    pub fn recognition(cause: impl std::fmt::Display) -> Self {
        Self::Recognition {
            message: cause.to_string(),
        }
    }

    /// Creates an [`OcrError::Timeout`] for the named field.
    pub fn timeout(field: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            field: field.into(),
            timeout_ms,
        }
    }

    /// Creates an [`OcrError::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Convenient result alias for extraction operations.
pub type OcrResult<T> = Result<T, OcrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_the_kind() {
        let err = OcrError::invalid_field_bounds("total", "x + w = 30 exceeds image width 25");
        assert!(err.to_string().contains("invalid field bounds"));
        assert!(err.to_string().contains("total"));

        let err = OcrError::timeout("total", 500);
        assert!(err.to_string().contains("timed out after 500 ms"));

        let err = OcrError::transform("combined", "zero-sized input");
        assert!(err.to_string().contains("combined"));
    }
}
