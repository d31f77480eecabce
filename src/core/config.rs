//! Configuration for the extraction pipeline.
//!
//! All configuration is carried in an explicit [`EngineConfig`] passed to
//! the orchestrator at construction time; the crate keeps no process-wide
//! mutable state.

use serde::{Deserialize, Serialize};

use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::errors::{OcrError, OcrResult};

/// Configuration accepted by [`FieldExtractor`](crate::pipeline::FieldExtractor)
/// and the recognition backend.
///
/// All fields have serde defaults, so a partial JSON document deserializes
/// into a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Recognition language models to load, combined in order
    /// (e.g. `["eng", "ind"]` becomes `eng+ind` for Tesseract).
    #[serde(default = "EngineConfig::default_languages")]
    pub languages: Vec<String>,

    /// Minimum composite confidence for a field result to be flagged as
    /// successful. Used only for the final `success` flag; strategy
    /// selection always compares raw confidences.
    #[serde(default = "EngineConfig::default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Enables the quality-gated preprocessing fast path. The exhaustive
    /// strategy sweep is the authoritative default; this accelerator may
    /// skip or shorten it for crops the quality analyzer rates highly.
    #[serde(default)]
    pub auto_preprocess: bool,

    /// Upper bound on one field's entire strategy sweep, in milliseconds.
    /// An overrun is recorded as a failed result with a timeout error and
    /// the batch continues. `None` disables the bound.
    #[serde(default)]
    pub field_timeout_ms: Option<u64>,

    /// Field counts above this threshold are processed on the rayon
    /// thread pool; strategies within one field always run sequentially.
    #[serde(default = "EngineConfig::default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Minimum accepted source image size as (width, height).
    #[serde(default = "EngineConfig::default_min_image_size")]
    pub min_image_size: (u32, u32),

    /// Maximum accepted source image size as (width, height).
    #[serde(default = "EngineConfig::default_max_image_size")]
    pub max_image_size: (u32, u32),
}

impl EngineConfig {
    fn default_languages() -> Vec<String> {
        vec!["eng".to_string(), "ind".to_string()]
    }

    fn default_confidence_threshold() -> f64 {
        0.6
    }

    fn default_parallel_threshold() -> usize {
        DEFAULT_PARALLEL_THRESHOLD
    }

    fn default_min_image_size() -> (u32, u32) {
        (50, 20)
    }

    fn default_max_image_size() -> (u32, u32) {
        (2000, 2000)
    }

    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the configuration is usable.
    /// * `Err(OcrError::Config)` - Describing the first violated constraint.
    pub fn validate(&self) -> OcrResult<()> {
        if self.languages.is_empty() {
            return Err(OcrError::config("at least one language must be set"));
        }
        if self.languages.iter().any(|l| l.trim().is_empty()) {
            return Err(OcrError::config("language codes must be non-empty"));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(OcrError::config(format!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        let (min_w, min_h) = self.min_image_size;
        let (max_w, max_h) = self.max_image_size;
        if min_w == 0 || min_h == 0 {
            return Err(OcrError::config("min_image_size dimensions must be positive"));
        }
        if max_w < min_w || max_h < min_h {
            return Err(OcrError::config(format!(
                "max_image_size {}x{} is smaller than min_image_size {}x{}",
                max_w, max_h, min_w, min_h
            )));
        }
        if self.field_timeout_ms == Some(0) {
            return Err(OcrError::config("field_timeout_ms must be positive when set"));
        }
        Ok(())
    }

    /// The configured languages joined for the Tesseract command line.
    pub fn language_spec(&self) -> String {
        self.languages.join("+")
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            languages: Self::default_languages(),
            confidence_threshold: Self::default_confidence_threshold(),
            auto_preprocess: false,
            field_timeout_ms: None,
            parallel_threshold: Self::default_parallel_threshold(),
            min_image_size: Self::default_min_image_size(),
            max_image_size: Self::default_max_image_size(),
        }
    }
}
